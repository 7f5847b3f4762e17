use payout_types::keys::*;
use payout_types::{CrossChainOrder, ProtectedInput};
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::{ConfidentialOutput, Erc20Outcome, Stage, StageError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Failed,
    Skipped,
}

/// What one stage contributes to the output artifacts
///
/// `entries` are the stage's `computed.json` keys and `summary` its block
/// of `result.txt`.
#[derive(Clone, Debug)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
    pub entries: Map<String, Value>,
    pub summary: String,
}

const SECRET_RULE: &str = "========================";
const CROSS_CHAIN_RULE: &str = "=============================";
const ERC20_RULE: &str = "=====================";
const PROTECTED_RULE: &str = "======================";

fn failed_block(title: &str, rule: &str, headline: &str, error: &StageError) -> String {
    format!("\n{title}:\n{rule}\n{headline}\n\nError: {error}\n\nStatus: FAILED\n{rule}\n\n")
}

impl StageReport {
    /// A disabled stage: reported, but contributes nothing
    pub fn skipped(stage: Stage) -> Self {
        Self {
            stage,
            status: StageStatus::Skipped,
            entries: Map::new(),
            summary: String::new(),
        }
    }

    fn failed(stage: Stage, error_key: &str, summary: String, error: &StageError) -> Self {
        let mut entries = Map::new();
        entries.insert(error_key.to_string(), Value::String(error.message.clone()));
        Self {
            stage,
            status: StageStatus::Failed,
            entries,
            summary,
        }
    }

    pub fn confidential_transfer(result: &Result<ConfidentialOutput, StageError>) -> Self {
        let stage = Stage::ConfidentialTransfer;
        let title = "SECRET TRANSFER RESULTS";

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                let summary = failed_block(title, SECRET_RULE, "Secret transfer failed!", e);
                return Self::failed(stage, SECRET_TRANSFER_ERROR, summary, e);
            }
        };
        let receipt = &output.receipt;

        let mut entries = Map::new();
        entries.insert(SECRET_TRANSFER_TX_HASH.into(), json!(receipt.tx_hash));
        entries.insert(SECRET_TRANSFER_CONTRACT.into(), json!(receipt.contract));

        let amount_line = if output.disclosed {
            entries.insert(SECRET_TRANSFER_AMOUNT.into(), json!(output.amount.to_string()));
            format!(
                "- Amount: {} ({} decimals)\n",
                output.amount, output.decimals
            )
        } else {
            String::new()
        };

        let summary = format!(
            "\n{title}:\n{SECRET_RULE}\nSecret transfer initiated successfully!\n\n\
             Transfer Details:\n{amount_line}- Contract: {}\n- User: {}\n- Transaction Hash: {}\n\n\
             Encrypted Data:\n- Handles: {}\n- Input Proof: {}\n\n\
             Status: COMPLETED\n{SECRET_RULE}\n\n",
            receipt.contract,
            receipt.user,
            receipt.tx_hash,
            json!(receipt.handles),
            receipt.input_proof,
        );

        Self {
            stage,
            status: StageStatus::Completed,
            entries,
            summary,
        }
    }

    pub fn cross_chain(result: &Result<CrossChainOrder, StageError>) -> Self {
        let stage = Stage::CrossChain;
        let title = "CROSS-CHAIN TRANSFER RESULTS";

        let order = match result {
            Ok(order) => order,
            Err(e) => {
                let summary = failed_block(title, CROSS_CHAIN_RULE, "Fusion+ order failed!", e);
                return Self::failed(stage, CROSS_CHAIN_ERROR, summary, e);
            }
        };

        let mut entries = Map::new();
        entries.insert(CROSS_CHAIN_ORDER_HASH.into(), json!(order.order_hash));
        entries.insert(CROSS_CHAIN_SRC_CHAIN.into(), json!(order.src_chain.chain_id()));
        entries.insert(CROSS_CHAIN_DST_CHAIN.into(), json!(order.dst_chain.chain_id()));
        entries.insert(CROSS_CHAIN_AMOUNT.into(), json!(order.amount));

        let summary = format!(
            "\n{title}:\n{CROSS_CHAIN_RULE}\nFusion+ order placed successfully!\n\n\
             Order Details:\n- Order Hash: {}\n- Source Chain: {} ({})\n\
             - Destination Chain: {} ({})\n- Source Token: {}\n- Destination Token: {}\n\
             - Amount: {}\n- Maker Address: {}\n- Hash Lock: {}\n\n\
             Status: ORDER_PLACED\n{CROSS_CHAIN_RULE}\n\n",
            order.order_hash,
            order.src_chain.chain_id(),
            order.src_chain.name(),
            order.dst_chain.chain_id(),
            order.dst_chain.name(),
            order.src_token,
            order.dst_token,
            order.amount,
            order.maker,
            order.hash_lock,
        );

        Self {
            stage,
            status: StageStatus::Completed,
            entries,
            summary,
        }
    }

    /// Snapshot of the protected fields; `N/A` everywhere when the read failed
    pub fn protected_data(result: &Result<ProtectedInput, StageError>) -> Self {
        let (status, input, data) = match result {
            Ok(input) => (StageStatus::Completed, input.clone(), json!(input.values())),
            Err(_) => (StageStatus::Failed, ProtectedInput::unavailable(), Value::Null),
        };

        let mut entries = Map::new();
        entries.insert(PROTECTED_DATA.into(), data);

        let summary = format!(
            "\nPROTECTED DATA RESULTS:\n{PROTECTED_RULE}\nInvoice ID: {}\nAmount: {}\n\
             Chain: {}\nToken: {}\nWallet: {}\n{PROTECTED_RULE}\n",
            input.invoice_id, input.amount, input.chain, input.token, input.wallet,
        );

        Self {
            stage: Stage::ProtectedData,
            status,
            entries,
            summary,
        }
    }

    pub fn erc20(result: &Result<Erc20Outcome, StageError>) -> Self {
        let stage = Stage::Erc20;
        let title = "ERC20 TRANSFER RESULTS";

        match result {
            Ok(Erc20Outcome::Sent(receipt)) => {
                let mut entries = Map::new();
                entries.insert(ERC20_TX_HASH.into(), json!(receipt.tx_hash));

                let summary = format!(
                    "\n{title}:\n{ERC20_RULE}\nERC20 transfer confirmed!\n\n\
                     - Recipient: {}\n- Value: {}\n- Transaction Hash: {}\n\n\
                     Status: COMPLETED\n{ERC20_RULE}\n\n",
                    receipt.recipient, receipt.value, receipt.tx_hash,
                );

                Self {
                    stage,
                    status: StageStatus::Completed,
                    entries,
                    summary,
                }
            }
            Ok(Erc20Outcome::Skipped { missing_sender_key }) => {
                let mut entries = Map::new();
                if *missing_sender_key {
                    entries.insert(ERC20_ERROR.into(), json!("Missing sender private key"));
                }

                let summary = format!(
                    "\n{title}:\n{ERC20_RULE}\nERC20 transfer skipped: parameters not fully provided\n\n\
                     Status: SKIPPED\n{ERC20_RULE}\n\n"
                );

                Self {
                    stage,
                    status: StageStatus::Skipped,
                    entries,
                    summary,
                }
            }
            Err(e) => {
                let summary = failed_block(title, ERC20_RULE, "ERC20 transfer failed!", e);
                Self::failed(stage, ERC20_ERROR, summary, e)
            }
        }
    }
}
