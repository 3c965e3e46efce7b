//! S3-compatible document storage client
//!
//! The bucket is private; documents are only reachable through presigned URLs.
//! Uses rust-s3 crate for lightweight S3 operations.

use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};

use crate::core::config::StorageConfig;
use crate::core::error::AppError;

pub struct DocumentStorage {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    signed_url_expiry_secs: u32,
    endpoint: String,
}

impl DocumentStorage {
    /// Create a storage client from configuration and make sure the bucket exists
    pub async fn new(config: StorageConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create storage credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create storage bucket: {}", e)))?;

        // Path-style URLs for MinIO (http://endpoint/bucket instead of http://bucket.endpoint)
        bucket.set_path_style();

        let storage = Self {
            bucket,
            region,
            credentials,
            signed_url_expiry_secs: config.signed_url_expiry_secs,
            endpoint: config.endpoint,
        };

        storage.ensure_bucket_exists().await;

        info!(
            "Document storage initialized for endpoint: {}, bucket: {}",
            storage.endpoint,
            storage.bucket.name()
        );

        Ok(storage)
    }

    /// Create the bucket if missing. Failures are logged, not fatal.
    async fn ensure_bucket_exists(&self) {
        let result = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match result {
            Ok(response) if response.success() => {
                info!("Bucket '{}' created successfully", self.bucket.name())
            }
            Ok(response)
                if response.response_text.contains("BucketAlreadyOwnedByYou")
                    || response.response_text.contains("BucketAlreadyExists") =>
            {
                debug!("Bucket '{}' already exists", self.bucket.name());
            }
            Ok(response) => warn!(
                "Could not create bucket '{}': HTTP {}. Assuming it exists.",
                self.bucket.name(),
                response.response_code
            ),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                    || error_str.contains("already own it")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
            }
        }
    }

    /// Upload an object under `key`
    pub async fn upload(&self, key: &str, data: &[u8], content_type: &str) -> Result<(), AppError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, data, content_type)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to upload file '{}': {}", key, e))
            })?;
        ensure_success("upload", key, response.status_code())?;

        debug!("Uploaded '{}' to bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    /// Time-limited GET URL for a stored document
    pub async fn signed_url(&self, key: &str) -> Result<String, AppError> {
        self.bucket
            .presign_get(key, self.signed_url_expiry_secs, None)
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!(
                    "Failed to sign URL for '{}': {}",
                    key, e
                ))
            })
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        let response = self.bucket.delete_object(key).await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to delete file '{}': {}", key, e))
        })?;
        ensure_success("delete", key, response.status_code())?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    pub fn signed_url_expiry_secs(&self) -> u32 {
        self.signed_url_expiry_secs
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }
}

/// The client returns refused requests as `Ok`; anything outside 2xx is a failure.
fn ensure_success(operation: &str, key: &str, status: u16) -> Result<(), AppError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(AppError::ExternalServiceError(format!(
            "Failed to {} file '{}': storage responded with HTTP {}",
            operation, key, status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    /// Reads one HTTP request (headers and body) and answers with `status`.
    async fn answer(mut socket: TcpStream, status: &'static str) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => return,
                Ok(n) => n,
            };
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };
        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while buf.len() < header_end + content_length {
            match socket.read(&mut chunk).await {
                Ok(0) | Err(_) => break,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
            }
        }

        let body = "<?xml version=\"1.0\"?><Error><Code>AccessDenied</Code></Error>";
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    }

    async fn storage_behind(status: &'static str) -> DocumentStorage {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((socket, _)) = listener.accept().await {
                tokio::spawn(answer(socket, status));
            }
        });

        DocumentStorage::new(StorageConfig {
            endpoint: format!("http://{}", addr),
            access_key: "test-access".to_string(),
            secret_key: "test-secret".to_string(),
            bucket: "loan-documents".to_string(),
            region: "us-east-1".to_string(),
            signed_url_expiry_secs: 600,
        })
        .await
        .unwrap()
    }

    #[test]
    fn test_ensure_success_accepts_only_2xx() {
        assert!(ensure_success("upload", "k", 200).is_ok());
        assert!(ensure_success("delete", "k", 204).is_ok());
        assert!(matches!(
            ensure_success("upload", "k", 403),
            Err(AppError::ExternalServiceError(_))
        ));
        assert!(ensure_success("upload", "k", 503).is_err());
    }

    #[tokio::test]
    async fn test_refused_upload_and_delete_are_errors() {
        let storage = storage_behind("403 Forbidden").await;

        let uploaded = storage
            .upload("loans/a/1_deadbeef.pdf", b"%PDF-1.4", "application/pdf")
            .await;
        assert!(matches!(uploaded, Err(AppError::ExternalServiceError(_))));

        let deleted = storage.delete("loans/a/1_deadbeef.pdf").await;
        assert!(matches!(deleted, Err(AppError::ExternalServiceError(_))));
    }

    #[tokio::test]
    async fn test_accepted_upload_and_delete_succeed() {
        let storage = storage_behind("200 OK").await;

        assert!(storage
            .upload("loans/a/1_deadbeef.pdf", b"%PDF-1.4", "application/pdf")
            .await
            .is_ok());
        assert!(storage.delete("loans/a/1_deadbeef.pdf").await.is_ok());
    }
}
