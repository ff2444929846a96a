//! Compiled contract artifacts.
//!
//! Both the Hardhat layout (`artifacts/contracts/NFT.sol/NFT.json`, bytecode as a
//! hex string) and the Foundry layout (`out/NFT.sol/NFT.json`, bytecode under
//! `bytecode.object`) are understood.

use crate::error::DeployError;
use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt},
    hex,
    json_abi::JsonAbi,
    primitives::Bytes,
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

type LinkReferences = BTreeMap<String, BTreeMap<String, serde_json::Value>>;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    #[serde(rename_all = "camelCase")]
    Object {
        object: String,
        #[serde(default)]
        link_references: LinkReferences,
    },
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    source_name: Option<String>,
    abi: JsonAbi,
    bytecode: RawBytecode,
    #[serde(default)]
    link_references: LinkReferences,
}

impl RawArtifact {
    fn read(path: &Path) -> Result<Self, DeployError> {
        let contents = fs::read_to_string(path).map_err(|e| DeployError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| DeployError::InvalidArtifact {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    // Hardhat records the source path, Foundry only encodes the file name in
    // the parent directory.
    fn matches_source(&self, path: &Path, source: &str) -> bool {
        match &self.source_name {
            Some(source_name) => source_name == source,
            None => {
                let dir = path.parent().and_then(Path::file_name);
                dir.is_some() && dir == Path::new(source).file_name()
            }
        }
    }

    fn into_artifact(self, path: &Path) -> Result<Artifact, DeployError> {
        let name = match self.contract_name {
            Some(name) => name,
            None => path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
        };
        let (code, mut links) = match self.bytecode {
            RawBytecode::Hex(code) => (code, LinkReferences::new()),
            RawBytecode::Object {
                object,
                link_references,
            } => (object, link_references),
        };
        links.extend(self.link_references);

        let code = code.trim();
        let code = code.strip_prefix("0x").unwrap_or(code);
        if code.is_empty() {
            return Err(DeployError::AbstractContract(name));
        }
        if !code.is_ascii() {
            return Err(DeployError::InvalidArtifact {
                path: path.to_path_buf(),
                reason: "bytecode is not valid hex".to_string(),
            });
        }
        if code.contains("__") {
            let libraries = if links.is_empty() {
                placeholders(code)
            } else {
                links
                    .iter()
                    .flat_map(|(source, libs)| libs.keys().map(move |lib| format!("{source}:{lib}")))
                    .collect()
            };
            return Err(DeployError::UnlinkedLibraries { name, libraries });
        }
        let bytecode = hex::decode(code).map_err(|e| DeployError::InvalidArtifact {
            path: path.to_path_buf(),
            reason: format!("bytecode is not valid hex: {e}"),
        })?;

        Ok(Artifact {
            name,
            source_name: self.source_name,
            abi: self.abi,
            bytecode: bytecode.into(),
            path: path.to_path_buf(),
        })
    }
}

/// Library placeholders left in bytecode by the compiler, each 40 characters
/// starting with `__`.
fn placeholders(code: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    let mut rest = code;
    while let Some(start) = rest.find("__") {
        let end = (start + 40).min(rest.len());
        let placeholder = rest[start..end].to_string();
        if !found.contains(&placeholder) {
            found.push(placeholder);
        }
        rest = &rest[end..];
    }
    found
}

/// A deployable contract: its ABI and creation bytecode.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub name: String,
    pub source_name: Option<String>,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
    pub path: PathBuf,
}

impl Artifact {
    pub fn from_file(path: &Path) -> Result<Self, DeployError> {
        RawArtifact::read(path)?.into_artifact(path)
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn deploy_data(&self, args: &[DynSolValue]) -> Result<Bytes, DeployError> {
        let encoded = match &self.abi.constructor {
            Some(constructor) => constructor.abi_encode_input(args).map_err(|source| {
                DeployError::ConstructorArguments {
                    name: self.name.clone(),
                    source,
                }
            })?,
            None if args.is_empty() => Vec::new(),
            None => {
                return Err(DeployError::ConstructorArguments {
                    name: self.name.clone(),
                    source: alloy::dyn_abi::Error::EncodeLengthMismatch {
                        expected: 0,
                        actual: args.len(),
                    },
                })
            }
        };
        Ok([&self.bytecode[..], encoded.as_slice()].concat().into())
    }
}

/// Resolves contract names to artifacts below a root directory.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Looks up `name`, either a bare contract name (`NFT`) or a fully
    /// qualified one (`contracts/NFT.sol:NFT`).
    pub fn find(&self, name: &str) -> Result<Artifact, DeployError> {
        let (source, contract) = match name.rsplit_once(':') {
            Some((source, contract)) => (Some(source), contract),
            None => (None, name),
        };
        let not_found = || DeployError::ArtifactNotFound {
            name: name.to_string(),
            root: self.root.clone(),
        };
        if !self.root.is_dir() {
            return Err(not_found());
        }

        let mut files = Vec::new();
        collect_candidates(&self.root, &format!("{contract}.json"), &mut files)?;
        files.sort();
        // Both layouts keep an artifact under a directory named after its
        // source file, so unrelated sources are skipped before parsing.
        if let Some(source_file) = source.and_then(|s| Path::new(s).file_name()) {
            files.retain(|path| path.parent().and_then(Path::file_name) == Some(source_file));
        }

        let mut matches = Vec::new();
        for path in files {
            let raw = RawArtifact::read(&path)?;
            if source.is_some_and(|source| !raw.matches_source(&path, source)) {
                continue;
            }
            matches.push((path, raw));
        }

        match matches.len() {
            0 => Err(not_found()),
            1 => {
                let (path, raw) = matches.remove(0);
                debug!("Resolved {} to {}", name, path.display());
                raw.into_artifact(&path)
            }
            _ => Err(DeployError::AmbiguousArtifact {
                name: name.to_string(),
                candidates: matches.into_iter().map(|(path, _)| path).collect(),
            }),
        }
    }
}

fn collect_candidates(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> Result<(), DeployError> {
    let entries = fs::read_dir(dir).map_err(|e| DeployError::io(dir, e))?;
    for entry in entries {
        let path = entry.map_err(|e| DeployError::io(dir, e))?.path();
        if path.is_dir() {
            if path.file_name().is_some_and(|n| n == "build-info") {
                continue;
            }
            collect_candidates(&path, file_name, out)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            out.push(path);
        }
    }
    Ok(())
}
