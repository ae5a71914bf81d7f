//! Graph persistence.
//!
//! The persisted form is the raw adjacency list and nothing else. Two codecs
//! are supported: JSON for human-editable files and MessagePack for compact
//! binary snapshots. Every load is validated before a [`Graph`] is handed
//! back, so a malformed payload never reaches the engine.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::debug;

use super::{Graph, VertexId};
use crate::error::SerializationError;

/// On-disk encoding of a persisted graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    MsgPack,
}

impl Format {
    /// Pick a format from a file extension; anything other than `msgpack`
    /// or `mpk` is treated as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("msgpack") | Some("mpk") => Format::MsgPack,
            _ => Format::Json,
        }
    }
}

/// Encode a graph in the given format.
pub fn to_bytes(graph: &Graph, format: Format) -> Result<Vec<u8>, SerializationError> {
    let bytes = match format {
        Format::Json => serde_json::to_vec(graph.adjacency())?,
        Format::MsgPack => rmp_serde::to_vec(graph.adjacency())?,
    };
    Ok(bytes)
}

/// Decode and validate a graph.
pub fn from_bytes(bytes: &[u8], format: Format) -> Result<Graph, SerializationError> {
    let adjacency: Vec<Vec<VertexId>> = match format {
        Format::Json => serde_json::from_slice(bytes)?,
        Format::MsgPack => rmp_serde::from_slice(bytes)?,
    };

    let graph = Graph::from_adjacency(adjacency);
    graph
        .validate()
        .map_err(|e| SerializationError::Malformed(e.to_string()))?;
    Ok(graph)
}

/// Write a graph to `path`, choosing the format from its extension.
pub async fn save(graph: &Graph, path: impl AsRef<Path>) -> Result<(), SerializationError> {
    let path = path.as_ref();
    let bytes = to_bytes(graph, Format::from_path(path))?;
    fs::write(path, bytes).await?;
    debug!(path = %path.display(), vertices = graph.vertex_count(), "saved graph");
    Ok(())
}

/// Read a graph from `path`, choosing the format from its extension.
pub async fn load(path: impl AsRef<Path>) -> Result<Graph, SerializationError> {
    let path = path.as_ref();
    let bytes = fs::read(path).await?;
    let graph = from_bytes(&bytes, Format::from_path(path))?;
    debug!(path = %path.display(), vertices = graph.vertex_count(), "loaded graph");
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphGenerator;

    #[test]
    fn generated_graphs_survive_both_codecs() {
        let mut generator = GraphGenerator::seeded(99);
        for n in [1, 5, 17] {
            let graph = generator.generate(n).unwrap();
            for format in [Format::Json, Format::MsgPack] {
                let bytes = to_bytes(&graph, format).unwrap();
                assert_eq!(from_bytes(&bytes, format).unwrap(), graph);
            }
        }
    }

    #[test]
    fn dangling_edge_is_malformed() {
        let err = from_bytes(b"[[1],[4]]", Format::Json).unwrap_err();
        assert!(matches!(err, SerializationError::Malformed(_)));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            from_bytes(b"{\"not\": \"a graph\"}", Format::Json),
            Err(SerializationError::Json(_))
        ));
        assert!(matches!(
            from_bytes(&[0xc1], Format::MsgPack),
            Err(SerializationError::MsgPackDecode(_))
        ));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("g.msgpack")), Format::MsgPack);
        assert_eq!(Format::from_path(Path::new("g.json")), Format::Json);
        assert_eq!(Format::from_path(Path::new("g")), Format::Json);
    }

    #[tokio::test]
    async fn save_then_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("scc-replay-{}", std::process::id()));
        fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("graph.mpk");

        let graph = Graph::from_adjacency(vec![vec![1], vec![2], vec![0, 3], vec![]]);
        save(&graph, &path).await.unwrap();
        assert_eq!(load(&path).await.unwrap(), graph);

        fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let err = load("/definitely/not/here.json").await.unwrap_err();
        assert!(matches!(err, SerializationError::Io(_)));
    }
}
