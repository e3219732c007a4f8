//! AWS KMS client.
//!
//! Enabled by the `aws` feature. Credentials come from the default provider
//! chain (`AWS_ACCESS_KEY_ID`, profiles, instance roles); secretcrypt never
//! handles them. Each call builds a current-thread runtime and a client for
//! the requested region, then blocks until the SDK returns.

use aws_config::{BehaviorVersion, Region};
use aws_sdk_kms::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_kms::primitives::Blob;
use aws_sdk_kms::types::DataKeySpec;
use tracing::trace;
use zeroize::Zeroizing;

use super::{DataKey, KmsClient};
use crate::error::KmsError;

/// AWS Key Management Service client.
#[derive(Debug, Clone, Default)]
pub struct AwsKms {
    /// Endpoint override (e.g. LocalStack); `None` uses the AWS endpoint.
    endpoint: Option<String>,
}

impl AwsKms {
    pub fn new(endpoint: Option<String>) -> Self {
        Self { endpoint }
    }

    fn runtime() -> Result<tokio::runtime::Runtime, KmsError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| KmsError::Unavailable(format!("failed to create runtime: {}", e)))
    }

    async fn client(&self, region: &str) -> aws_sdk_kms::Client {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.to_string()));
        if let Some(endpoint) = &self.endpoint {
            loader = loader.endpoint_url(endpoint.clone());
        }
        let config = loader.load().await;
        aws_sdk_kms::Client::new(&config)
    }
}

/// Map an SDK failure onto [`KmsError`] by its service error code.
fn classify<E>(err: SdkError<E>, key_id: &str) -> KmsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match err.code() {
        Some("NotFoundException") => KmsError::KeyNotFound(key_id.to_string()),
        Some("AccessDeniedException")
        | Some("DisabledException")
        | Some("KMSInvalidStateException") => KmsError::AccessDenied(key_id.to_string()),
        Some("InvalidCiphertextException") | Some("IncorrectKeyException") => {
            KmsError::InvalidCiphertext
        }
        _ => KmsError::Service(DisplayErrorContext(&err).to_string()),
    }
}

impl KmsClient for AwsKms {
    fn generate_data_key(&self, key_id: &str, region: &str) -> Result<DataKey, KmsError> {
        trace!(key_id = %key_id, region = %region, "GenerateDataKey");

        Self::runtime()?.block_on(async {
            let output = self
                .client(region)
                .await
                .generate_data_key()
                .key_id(key_id)
                .key_spec(DataKeySpec::Aes256)
                .send()
                .await
                .map_err(|e| classify(e, key_id))?;

            let plaintext = output
                .plaintext()
                .map(|blob| Zeroizing::new(blob.as_ref().to_vec()))
                .ok_or_else(|| KmsError::Service("no plaintext data key returned".to_string()))?;
            let wrapped = output
                .ciphertext_blob()
                .map(|blob| blob.as_ref().to_vec())
                .ok_or_else(|| KmsError::Service("no wrapped data key returned".to_string()))?;

            trace!(wrapped_len = wrapped.len(), "received data key");
            Ok(DataKey { plaintext, wrapped })
        })
    }

    fn decrypt_data_key(
        &self,
        wrapped: &[u8],
        key_id: Option<&str>,
        region: &str,
    ) -> Result<Zeroizing<Vec<u8>>, KmsError> {
        trace!(key_id = ?key_id, region = %region, "Decrypt");

        Self::runtime()?.block_on(async {
            // KMS finds the key from the blob; passing the id pins it.
            let output = self
                .client(region)
                .await
                .decrypt()
                .ciphertext_blob(Blob::new(wrapped.to_vec()))
                .set_key_id(key_id.map(str::to_string))
                .send()
                .await
                .map_err(|e| classify(e, key_id.unwrap_or("<embedded>")))?;

            output
                .plaintext()
                .map(|blob| Zeroizing::new(blob.as_ref().to_vec()))
                .ok_or_else(|| KmsError::Service("no plaintext data key returned".to_string()))
        })
    }
}
