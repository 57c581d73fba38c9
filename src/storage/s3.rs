use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::{config::Region, primitives::ByteStream, Client};
use bytes::Bytes;

use crate::{
    config::Config,
    storage::{BlobStore, StorageError},
};

#[derive(Clone, Debug)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: &str) -> Self {
        Self {
            client,
            bucket: bucket.to_owned(),
        }
    }

    /// Builds a client from the ambient AWS credential chain. `S3_ENDPOINT`
    /// switches to path-style addressing for S3-compatible servers.
    pub async fn from_config(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()), &config.s3_bucket)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, content_type: &str, content: Bytes) -> Result<String, StorageError> {
        let size = content.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(|error| {
                log::error!("failed to put object '{}' into '{}': {}", key, self.bucket, error);
                StorageError {
                    key: key.to_owned(),
                    reason: error.to_string(),
                }
            })?;

        log::info!("stored {} bytes at s3://{}/{}", size, self.bucket, key);
        Ok(key.to_owned())
    }
}
