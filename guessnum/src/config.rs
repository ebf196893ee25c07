// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use {
    crate::error::ClientError,
    serde::{Deserialize, Serialize},
    solana_program::pubkey::Pubkey,
    solana_sdk::{
        commitment_config::{CommitmentConfig, CommitmentLevel},
        signature::Keypair,
    },
    std::{
        fmt,
        fs::File,
        io::{Read, Write},
        path::{Path, PathBuf},
        str::FromStr,
    },
};

/// Address of the deployed number guessing game program.
pub const DEFAULT_PROGRAM_ID: &str = "AKBW4poXphx8Hfj7ERY2gmDYn4vSG9ZqK6nZxm7GpWMX";

/// A Solana cluster, addressed by moniker or by URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Cluster {
    #[default]
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Cluster {
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://localhost:8899",
            Cluster::Custom(url) => url,
        }
    }
}

impl FromStr for Cluster {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "devnet" | "d" => Ok(Cluster::Devnet),
            "testnet" | "t" => Ok(Cluster::Testnet),
            "mainnet-beta" | "mainnet" | "m" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" | "l" => Ok(Cluster::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Cluster::Custom(url.to_string()))
            }
            other => Err(format!("unknown cluster {:?}", other)),
        }
    }
}

impl TryFrom<String> for Cluster {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Cluster> for String {
    fn from(cluster: Cluster) -> Self {
        cluster.to_string()
    }
}

impl fmt::Display for Cluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cluster::Devnet => write!(f, "devnet"),
            Cluster::Testnet => write!(f, "testnet"),
            Cluster::MainnetBeta => write!(f, "mainnet-beta"),
            Cluster::Localnet => write!(f, "localnet"),
            Cluster::Custom(url) => write!(f, "{}", url),
        }
    }
}

/// Connection and identity settings for the game client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub cluster: Cluster,
    pub program_id: String,
    pub keypair_path: PathBuf,
    pub commitment: CommitmentLevel,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            cluster: Cluster::default(),
            program_id: DEFAULT_PROGRAM_ID.to_string(),
            keypair_path: default_keypair_path(),
            commitment: CommitmentLevel::Confirmed,
        }
    }
}

impl ClientConfig {
    /// Loads a JSON config file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ClientError> {
        let mut data = String::new();
        File::open(path)?.read_to_string(&mut data)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn program_id(&self) -> Result<Pubkey, ClientError> {
        Pubkey::from_str(&self.program_id)
            .map_err(|_| ClientError::InvalidProgramId(self.program_id.clone()))
    }

    pub fn commitment_config(&self) -> CommitmentConfig {
        CommitmentConfig {
            commitment: self.commitment,
        }
    }
}

/// The Solana CLI default keypair location.
pub fn default_keypair_path() -> PathBuf {
    let mut path = std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default();
    path.extend([".config", "solana", "id.json"]);
    path
}

/// Reads a keypair stored as a JSON array of 64 bytes.
pub fn read_keypair(path: &Path) -> Result<Keypair, ClientError> {
    let mut keypair_data = String::new();
    File::open(path)
        .and_then(|mut file| file.read_to_string(&mut keypair_data))
        .map_err(|e| ClientError::Keypair(format!("{}: {}", path.display(), e)))?;
    let keypair_bytes: Vec<u8> = serde_json::from_str(&keypair_data)?;
    Keypair::from_bytes(&keypair_bytes).map_err(|e| ClientError::Keypair(e.to_string()))
}

/// Writes a keypair in the format read by [`read_keypair`].
pub fn write_keypair(keypair: &Keypair, path: &Path) -> Result<(), ClientError> {
    let keypair_json = serde_json::to_string(&keypair.to_bytes().to_vec())?;
    let mut file = File::create(path)?;
    file.write_all(keypair_json.as_bytes())?;
    Ok(())
}
