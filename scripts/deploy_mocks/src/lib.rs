//! Mock deployment step: on a local development chain, deploy a stand-in
//! VRF coordinator so tests never need funded access to the live one. On
//! every other network the step is a no-op.

use deployments::{Deploy, DeployError, DeployOptions, Logger, NamedAccounts};
use network_config::is_development_chain;

/// 0.25 LINK, the flat premium each randomness request costs.
pub const BASE_FEE: &str = "250000000000000000";

/// LINK per gas. Chainlink nodes pay the callback gas themselves, so the
/// request price tracks the gas price of the chain through this rate.
pub const GAS_PRICE_LINK: &str = "1000000000";

pub const VRF_COORDINATOR_MOCK: &str = "VRFCoordinatorV2Mock";

/// Everything the step needs from its surroundings, passed in explicitly.
pub struct DeployContext<'a, D: Deploy> {
    /// Symbolic name of the active network ("hardhat", "sepolia", ...).
    pub network: &'a str,
    pub accounts: &'a NamedAccounts,
    pub deployments: &'a D,
    pub log: &'a dyn Logger,
}

/// Runs the mock deployment step once.
///
/// Deploying a mock coordinator onto a live network would shadow the real
/// paid one, so anything outside the development-chain set returns
/// immediately with no side effects at all. Deployment failures propagate
/// unchanged; the step neither retries nor rewraps them.
pub async fn run<D: Deploy>(ctx: DeployContext<'_, D>) -> Result<(), DeployError> {
    if !is_development_chain(ctx.network) {
        return Ok(());
    }

    ctx.log.log("local network detected! Deploying mocks...");
    let deployer = ctx
        .accounts
        .address_of("deployer")
        .ok_or(DeployError::MissingAccount("deployer"))?;
    ctx.deployments
        .deploy(
            VRF_COORDINATOR_MOCK,
            DeployOptions {
                from: deployer,
                args: vec![BASE_FEE.to_string(), GAS_PRICE_LINK.to_string()],
                log: true,
            },
        )
        .await?;
    ctx.log.log("Mocks Deployed!");
    ctx.log.log("--------------------------------");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deployments::DeploymentRecord;
    use ethers::types::Address;
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

    #[derive(Default)]
    struct RecordingDeployer {
        calls: Mutex<Vec<(String, DeployOptions)>>,
        fail: bool,
    }

    impl RecordingDeployer {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(String, DeployOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Deploy for RecordingDeployer {
        async fn deploy(
            &self,
            contract: &str,
            opts: DeployOptions,
        ) -> Result<DeploymentRecord, DeployError> {
            self.calls
                .lock()
                .unwrap()
                .push((contract.to_string(), opts.clone()));
            if self.fail {
                return Err(DeployError::Rpc {
                    contract: contract.to_string(),
                    message: "insufficient funds".to_string(),
                });
            }
            Ok(DeploymentRecord {
                contract: contract.to_string(),
                address: Address::from_low_u64_be(0xabc),
                transaction_hash: None,
                args: opts.args,
                newly_deployed: true,
            })
        }
    }

    fn deployer_address() -> Address {
        Address::from_low_u64_be(1)
    }

    fn accounts() -> NamedAccounts {
        NamedAccounts::new(
            vec![deployer_address(), Address::from_low_u64_be(2)],
            network_config::named_accounts(),
        )
    }

    #[tokio::test]
    async fn live_networks_are_skipped_with_no_side_effects() {
        for network in ["sepolia", "mainnet", ""] {
            let deployments = RecordingDeployer::default();
            let log = RecordingLogger::default();

            run(DeployContext {
                network,
                accounts: &accounts(),
                deployments: &deployments,
                log: &log,
            })
            .await
            .unwrap();

            assert!(deployments.calls().is_empty());
            assert!(log.recorded().is_empty());
        }
    }

    #[tokio::test]
    async fn hardhat_gets_exactly_one_mock_with_the_fixed_args() {
        let deployments = RecordingDeployer::default();
        let log = RecordingLogger::default();

        run(DeployContext {
            network: "hardhat",
            accounts: &accounts(),
            deployments: &deployments,
            log: &log,
        })
        .await
        .unwrap();

        let calls = deployments.calls();
        assert_eq!(calls.len(), 1);
        let (contract, opts) = &calls[0];
        assert_eq!(contract, VRF_COORDINATOR_MOCK);
        assert_eq!(opts.args, vec!["250000000000000000", "1000000000"]);
        assert_eq!(opts.from, deployer_address());
        assert!(opts.log);

        let lines = log.recorded();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "local network detected! Deploying mocks...");
        assert_eq!(lines[1], "Mocks Deployed!");
        assert_eq!(lines[2], "--------------------------------");
    }

    #[tokio::test]
    async fn localhost_counts_as_a_development_chain() {
        let deployments = RecordingDeployer::default();
        let log = RecordingLogger::default();

        run(DeployContext {
            network: "localhost",
            accounts: &accounts(),
            deployments: &deployments,
            log: &log,
        })
        .await
        .unwrap();

        assert_eq!(deployments.calls().len(), 1);
        assert_eq!(log.recorded().len(), 3);
    }

    #[tokio::test]
    async fn deployment_failure_propagates_with_no_completion_log() {
        let deployments = RecordingDeployer::failing();
        let log = RecordingLogger::default();

        let err = run(DeployContext {
            network: "hardhat",
            accounts: &accounts(),
            deployments: &deployments,
            log: &log,
        })
        .await
        .unwrap_err();

        match err {
            DeployError::Rpc { contract, message } => {
                assert_eq!(contract, VRF_COORDINATOR_MOCK);
                assert_eq!(message, "insufficient funds");
            }
            other => panic!("unexpected error: {other}"),
        }
        // The announcement went out, the completion lines did not.
        assert_eq!(
            log.recorded(),
            vec!["local network detected! Deploying mocks..."]
        );
    }

    #[tokio::test]
    async fn missing_deployer_role_is_an_error() {
        let deployments = RecordingDeployer::default();
        let log = RecordingLogger::default();
        let empty = NamedAccounts::new(Vec::new(), network_config::named_accounts());

        let err = run(DeployContext {
            network: "hardhat",
            accounts: &empty,
            deployments: &deployments,
            log: &log,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, DeployError::MissingAccount("deployer")));
        assert!(deployments.calls().is_empty());
    }
}
