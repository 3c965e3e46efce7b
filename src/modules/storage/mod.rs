//! Storage module for loan documents
//!
//! Provides an S3-compatible client (MinIO, Supabase S3, AWS) for uploads,
//! deletes and presigned download URLs.

mod document_storage;

pub use document_storage::DocumentStorage;
