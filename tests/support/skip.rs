/// Skip a test if AWS credentials or a test key are not configured.
#[macro_export]
macro_rules! skip_without_aws {
    () => {
        if std::env::var("AWS_ACCESS_KEY_ID").is_err() && std::env::var("AWS_PROFILE").is_err() {
            eprintln!("SKIPPED: neither AWS_ACCESS_KEY_ID nor AWS_PROFILE set");
            return;
        }
        if std::env::var("SECRETCRYPT_TEST_KMS_KEY").is_err() {
            eprintln!("SKIPPED: SECRETCRYPT_TEST_KMS_KEY not set (set to an AWS KMS key ARN)");
            return;
        }
    };
}
