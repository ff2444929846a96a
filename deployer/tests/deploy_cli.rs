use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::{fs, path::Path};
use tempfile::TempDir;

// Nothing listens on port 1, so every RPC request is refused.
static DEAD_NODE_URL: &str = "http://127.0.0.1:1";

fn deploy() -> Command {
    let mut cmd = Command::cargo_bin("deploy").unwrap();
    for var in [
        "RPC_URL",
        "NODE_HOST",
        "NODE_PORT",
        "OWNER_KEY",
        "CHAIN_ID",
        "MAX_GAS",
        "ARTIFACTS_DIR",
        "MARKET_CONTRACT",
        "NFT_CONTRACT",
        "DEPLOYMENT_OUTPUT",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "info");
    cmd
}

fn write_artifacts(root: &Path) {
    let market = json!({
        "contractName": "NFTMarket",
        "sourceName": "contracts/NFTMarket.sol",
        "abi": [],
        "bytecode": "0x00"
    });
    let nft = json!({
        "contractName": "NFT",
        "sourceName": "contracts/NFT.sol",
        "abi": [{
            "type": "constructor",
            "stateMutability": "nonpayable",
            "inputs": [{ "name": "marketplaceAddress", "type": "address", "internalType": "address" }]
        }],
        "bytecode": "0x00"
    });
    for (name, artifact) in [("NFTMarket", market), ("NFT", nft)] {
        let dir = root.join(format!("contracts/{name}.sol"));
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{name}.json")), artifact.to_string()).unwrap();
    }
}

#[test]
fn missing_artifacts_exit_with_failure() {
    let dir = TempDir::new().unwrap();
    deploy()
        .args(["--rpc-url", DEAD_NODE_URL])
        .arg("--artifacts-dir")
        .arg(dir.path().join("artifacts"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("deployment failed"))
        .stderr(predicate::str::contains("no artifact for contract NFTMarket"));
}

#[test]
fn unreachable_node_never_reaches_nft() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path());
    deploy()
        .args(["--rpc-url", DEAD_NODE_URL])
        .arg("--artifacts-dir")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("deployment transaction for NFTMarket failed"))
        .stderr(predicate::str::contains("Loaded NFT from").not());
}

#[test]
fn unusable_output_path_fails_before_deploying() {
    let dir = TempDir::new().unwrap();
    write_artifacts(dir.path());
    let taken = dir.path().join("taken");
    fs::write(&taken, "").unwrap();
    deploy()
        .args(["--rpc-url", DEAD_NODE_URL])
        .arg("--artifacts-dir")
        .arg(dir.path())
        .arg("--output")
        .arg(taken.join("deployment.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("io error"))
        .stderr(predicate::str::contains("Deploying NFTMarket").not());
}

#[test]
fn invalid_owner_key_exits_with_failure() {
    deploy()
        .args(["--rpc-url", DEAD_NODE_URL, "--owner-key", "0x1234"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("invalid owner key"));
}

#[test]
fn chain_id_check_needs_a_node() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("deployment.json");
    write_artifacts(dir.path());
    deploy()
        .args(["--rpc-url", DEAD_NODE_URL, "--chain-id", "31337"])
        .arg("--artifacts-dir")
        .arg(dir.path())
        .arg("--output")
        .arg(&output)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("rpc request failed"));
    assert!(!output.exists());
}
