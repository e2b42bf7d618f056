// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! Command-line surface for the `xmlenc` binary: a direct `clap` derive
//! struct rather than a validator-layered parser, since this tool has two
//! narrow subcommands instead of the broad operational surface a
//! validator layer earns its keep on.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser, Clone)]
#[command(name = "xmlenc")]
#[command(about = "Encrypt and decrypt XML documents using W3C XML Encryption")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enables debug-level logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Encrypts an XML document, a local file, or a standalone element.
    Encrypt {
        /// Path to the XML document containing the data to encrypt.
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the resulting document to.
        #[arg(short, long)]
        output: PathBuf,

        /// Path to a key file in `key_id=hex` format.
        #[arg(short, long)]
        key_file: PathBuf,

        /// `EncryptionMethod/@Algorithm` URI to encrypt with.
        #[arg(short, long, default_value = "http://www.w3.org/2001/04/xmlenc#aes256-gcm")]
        algorithm: String,

        /// Whether the plaintext is a whole element or just its children.
        #[arg(short = 't', long, value_enum, default_value_t = EncryptType::Element)]
        r#type: EncryptType,

        /// `Id` of the element within `input` to encrypt. Defaults to the
        /// document root.
        #[arg(long)]
        target_id: Option<String>,
    },

    /// Decrypts every `EncryptedData` element in an XML document.
    Decrypt {
        /// Path to the XML document containing `EncryptedData`.
        #[arg(short, long)]
        input: PathBuf,

        /// Path to write the recovered document to.
        #[arg(short, long)]
        output: PathBuf,

        /// Path to a key file in `key_id=hex` format.
        #[arg(short, long)]
        key_file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncryptType {
    Element,
    Content,
}

impl EncryptType {
    pub fn as_uri(self) -> &'static str {
        match self {
            Self::Element => "http://www.w3.org/2001/04/xmlenc#Element",
            Self::Content => "http://www.w3.org/2001/04/xmlenc#Content",
        }
    }
}

impl std::fmt::Display for EncryptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Content => write!(f, "content"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_encrypt_subcommand_with_defaults() {
        let cli = Cli::parse_from([
            "xmlenc",
            "encrypt",
            "--input",
            "in.xml",
            "--output",
            "out.xml",
            "--key-file",
            "keys.txt",
        ]);
        match cli.command {
            Command::Encrypt { algorithm, r#type, .. } => {
                assert_eq!(algorithm, "http://www.w3.org/2001/04/xmlenc#aes256-gcm");
                assert_eq!(r#type, EncryptType::Element);
            }
            Command::Decrypt { .. } => panic!("expected encrypt subcommand"),
        }
    }

    #[test]
    fn parses_decrypt_subcommand() {
        let cli = Cli::parse_from(["xmlenc", "decrypt", "-i", "in.xml", "-o", "out.xml", "-k", "keys.txt"]);
        assert!(matches!(cli.command, Command::Decrypt { .. }));
    }
}
