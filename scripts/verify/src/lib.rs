//! Best-effort contract verification against a block explorer.
//!
//! Verification is a convenience step, not a deployment-correctness
//! requirement: every outcome here is downgraded to a log line and nothing
//! is re-raised to the caller.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use deployments::Logger;
use ethers::abi::Token;
use ethers::etherscan::errors::EtherscanError;
use ethers::etherscan::verify::VerifyContract;
use ethers::etherscan::Client;
use ethers::types::{Address, U256};
use thiserror::Error;

const STATUS_POLL_ATTEMPTS: usize = 6;
const STATUS_POLL_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("constructor argument {0:?} is not a decimal unsigned integer")]
    InvalidArgument(String),
    #[error("verification service error: {0}")]
    Service(String),
    #[error(transparent)]
    Client(#[from] EtherscanError),
}

/// A remote verification service.
#[async_trait]
pub trait VerificationApi {
    async fn verify(
        &self,
        address: Address,
        constructor_args: &[String],
    ) -> Result<(), VerificationError>;
}

/// The remote service reports an already-verified contract only as free
/// text, so the check is a case-insensitive substring match. Isolated here
/// so it can be swapped for a structured code if the service ever exposes
/// one.
pub fn is_already_verified(err: &impl Display) -> bool {
    err.to_string().to_lowercase().contains("already verified")
}

/// Submits the contract for verification and logs the outcome. An
/// already-verified contract counts as success; any other failure is logged
/// raw and the caller moves on.
pub async fn verify_best_effort<A: VerificationApi>(
    api: &A,
    address: Address,
    constructor_args: &[String],
    log: &dyn Logger,
) {
    log.log("Verifying contract...");
    match api.verify(address, constructor_args).await {
        Ok(()) => log.log(&format!("Verified {address:?}")),
        Err(e) if is_already_verified(&e) => log.log("Already verified!"),
        Err(e) => log.log(&e.to_string()),
    }
}

/// Verification through the Etherscan API: submit the source, then poll the
/// returned receipt until the explorer reports a result.
#[derive(Debug)]
pub struct EtherscanVerifier {
    client: Client,
    contract_name: String,
    source: String,
    compiler_version: String,
}

impl EtherscanVerifier {
    pub fn new(
        client: Client,
        contract_name: impl Into<String>,
        source: impl Into<String>,
        compiler_version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            contract_name: contract_name.into(),
            source: source.into(),
            compiler_version: compiler_version.into(),
        }
    }

    /// Etherscan wants the ABI encoding of the constructor arguments as hex
    /// without a 0x prefix. Arguments arrive decimal-string encoded and are
    /// tokenized as uint256 values.
    fn encode_constructor_args(args: &[String]) -> Result<Option<String>, VerificationError> {
        if args.is_empty() {
            return Ok(None);
        }
        let tokens = args
            .iter()
            .map(|arg| {
                U256::from_dec_str(arg)
                    .map(Token::Uint)
                    .map_err(|_| VerificationError::InvalidArgument(arg.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(hex::encode(ethers::abi::encode(&tokens))))
    }
}

#[async_trait]
impl VerificationApi for EtherscanVerifier {
    async fn verify(
        &self,
        address: Address,
        constructor_args: &[String],
    ) -> Result<(), VerificationError> {
        let request = VerifyContract::new(
            address,
            self.contract_name.clone(),
            self.source.clone(),
            self.compiler_version.clone(),
        )
        .constructor_arguments(Self::encode_constructor_args(constructor_args)?);

        let submission = self.client.submit_contract_verification(&request).await?;
        if submission.status != "1" {
            // Carries "Contract source code already verified" among others.
            return Err(VerificationError::Service(submission.result));
        }

        let guid = submission.result;
        for _ in 0..STATUS_POLL_ATTEMPTS {
            tokio::time::sleep(STATUS_POLL_DELAY).await;
            let status = self
                .client
                .check_contract_verification_status(&guid)
                .await?;
            if status.result.contains("Pending") {
                continue;
            }
            if status.result.contains("Pass") {
                return Ok(());
            }
            return Err(VerificationError::Service(status.result));
        }
        Err(VerificationError::Service(format!(
            "verification of {address:?} still pending, giving up"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingLogger {
        fn recorded(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Logger for RecordingLogger {
        fn log(&self, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    enum StubOutcome {
        Verified,
        Error(String),
    }

    struct StubApi {
        outcome: StubOutcome,
    }

    #[async_trait]
    impl VerificationApi for StubApi {
        async fn verify(
            &self,
            _address: Address,
            _constructor_args: &[String],
        ) -> Result<(), VerificationError> {
            match &self.outcome {
                StubOutcome::Verified => Ok(()),
                StubOutcome::Error(message) => Err(VerificationError::Service(message.clone())),
            }
        }
    }

    #[test]
    fn already_verified_matches_any_casing() {
        assert!(is_already_verified(&"already verified"));
        assert!(is_already_verified(&"Contract source code already verified"));
        assert!(is_already_verified(&"ALREADY VERIFIED!"));
        assert!(is_already_verified(&"Smart-contract Already Verified."));
        assert!(!is_already_verified(&"execution reverted"));
        assert!(!is_already_verified(&"verified already"));
    }

    #[tokio::test]
    async fn already_verified_is_success_equivalent() {
        let api = StubApi {
            outcome: StubOutcome::Error("Contract source code already verified".to_string()),
        };
        let log = RecordingLogger::default();

        verify_best_effort(&api, Address::zero(), &[], &log).await;

        assert_eq!(log.recorded(), vec!["Verifying contract...", "Already verified!"]);
    }

    #[tokio::test]
    async fn other_errors_are_logged_raw_and_swallowed() {
        let api = StubApi {
            outcome: StubOutcome::Error("Invalid API Key".to_string()),
        };
        let log = RecordingLogger::default();

        verify_best_effort(&api, Address::zero(), &[], &log).await;

        let lines = log.recorded();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains("Invalid API Key"));
    }

    #[tokio::test]
    async fn success_logs_the_verified_address() {
        let api = StubApi {
            outcome: StubOutcome::Verified,
        };
        let log = RecordingLogger::default();

        verify_best_effort(&api, Address::zero(), &[], &log).await;

        let lines = log.recorded();
        assert_eq!(lines[0], "Verifying contract...");
        assert!(lines[1].starts_with("Verified "));
    }

    #[test]
    fn constructor_args_encode_as_unprefixed_uint256_words() {
        let args = vec!["1".to_string(), "2".to_string()];
        let encoded = EtherscanVerifier::encode_constructor_args(&args)
            .unwrap()
            .unwrap();

        assert_eq!(encoded, format!("{:064x}{:064x}", 1, 2));
    }

    #[test]
    fn empty_constructor_args_encode_as_none() {
        assert_eq!(EtherscanVerifier::encode_constructor_args(&[]).unwrap(), None);
    }

    #[test]
    fn bad_constructor_args_are_rejected() {
        let err = EtherscanVerifier::encode_constructor_args(&["0.25".to_string()]).unwrap_err();
        assert!(matches!(err, VerificationError::InvalidArgument(_)));
    }
}
