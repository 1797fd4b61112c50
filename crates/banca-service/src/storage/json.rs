//! JSON import/export of clients.

use crate::dto::{ClientResponse, CreateClientRequest};
use banca_core::{BancaError, BancaResult};
use std::path::Path;
use tracing::debug;

/// Reads a JSON array of clients from a file.
pub async fn read_clients(path: &Path) -> BancaResult<Vec<CreateClientRequest>> {
    debug!("Reading clients from {}", path.display());

    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        BancaError::Internal(format!("Failed to read {}: {}", path.display(), e))
    })?;

    let clients: Vec<CreateClientRequest> = serde_json::from_str(&contents)?;
    debug!("Read {} clients from {}", clients.len(), path.display());
    Ok(clients)
}

/// Writes clients to a file as a pretty-printed JSON array.
pub async fn write_clients(path: &Path, clients: &[ClientResponse]) -> BancaResult<()> {
    debug!("Writing {} clients to {}", clients.len(), path.display());

    let contents = serde_json::to_string_pretty(clients)?;
    tokio::fs::write(path, contents).await.map_err(|e| {
        BancaError::Internal(format!("Failed to write {}: {}", path.display(), e))
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_read_clients() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clients.json");
        std::fs::write(
            &path,
            r#"[
                {"id": 1, "name": "Jane", "username": "janedoe", "email": "jane@example.com"},
                {"name": "John", "username": "johndoe", "email": "john@example.com"}
            ]"#,
        )
        .unwrap();

        let clients = read_clients(&path).await.unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id, Some(1));
        assert_eq!(clients[1].id, None);
        assert_eq!(clients[1].username, "johndoe");
    }

    #[tokio::test]
    async fn test_read_clients_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_clients(&dir.path().join("missing.json")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_read_clients_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        match read_clients(&path).await.unwrap_err() {
            BancaError::Serialization(_) => {}
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_write_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        let clients = vec![ClientResponse {
            id: 7,
            name: "Jane".to_string(),
            username: "janedoe".to_string(),
            email: "jane@example.com".to_string(),
            cards: vec![],
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }];

        write_clients(&path, &clients).await.unwrap();
        let read_back = read_clients(&path).await.unwrap();
        assert_eq!(read_back.len(), 1);
        assert_eq!(read_back[0].id, Some(7));
        assert_eq!(read_back[0].username, "janedoe");
    }
}
