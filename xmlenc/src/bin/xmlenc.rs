// /////////////////////////////////////////////////////////////////////////////
// xmlenc
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! The `xmlenc` CLI binary: reads an XML document from disk, encrypts or
//! decrypts part of it, and writes the result back out.

use std::fs;
use std::process::ExitCode as ProcessExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use xmlenc::infrastructure::key_manager::{KeyNameWriter, StaticKeyManager};
use xmlenc::infrastructure::transform_factory::StandardTransformFactory;
use xmlenc::infrastructure::xml_dom;
use xmlenc::{encrypt_node, ProcessingContext};
use xmlenc_bootstrap::{init_logging, BootstrapLogger, Cli, Command, ConsoleLogger, ExitCode};

fn main() -> ProcessExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let logger = ConsoleLogger::new();

    match run(&cli) {
        Ok(()) => ProcessExitCode::from(ExitCode::Success.as_i32() as u8),
        Err(err) => {
            logger.error(&format!("{err:#}"));
            let code = ExitCode::from_error(&*err);
            ProcessExitCode::from(code.as_i32() as u8)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Encrypt { input, output, key_file, algorithm, r#type, target_id } => {
            run_encrypt(input, output, key_file, algorithm, *r#type, target_id.as_deref())
        }
        Command::Decrypt { input, output, key_file } => run_decrypt(input, output, key_file),
    }
}

fn run_encrypt(
    input: &std::path::Path,
    output: &std::path::Path,
    key_file: &std::path::Path,
    algorithm: &str,
    encrypt_type: xmlenc_bootstrap::EncryptType,
    target_id: Option<&str>,
) -> Result<()> {
    let xml = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let mut root = xml_dom::parse_document(&xml).context("parsing input document")?;

    let key_file_path = key_file.to_str().context("key file path is not valid UTF-8")?;
    let key_manager = StaticKeyManager::from_file(key_file_path).context("loading key file")?;
    let key_info_writer = KeyNameWriter::new();
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory)
        .with_key_info_writer(&key_info_writer)
        .with_default_method(algorithm);

    let target_path = match target_id {
        Some(id) => xml_dom::find_path_by_id(&root, id).context("target-id not found in input document")?,
        None => Vec::new(),
    };

    let mut template = xmlenc_domain::builders::create(None, Some(encrypt_type.as_uri()), None, None);
    xmlenc_domain::builders::add_encryption_method(&mut template, algorithm)?;
    xmlenc_domain::builders::add_key_info(&mut template)?;

    encrypt_node(&mut root, &target_path, template, &ctx, None).context("encrypting target element")?;

    let dumped = xml_dom::dump_element(&root).context("serializing result document")?;
    fs::write(output, dumped).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}

fn run_decrypt(input: &std::path::Path, output: &std::path::Path, key_file: &std::path::Path) -> Result<()> {
    let xml = fs::read_to_string(input).with_context(|| format!("reading {}", input.display()))?;
    let mut root = xml_dom::parse_document(&xml).context("parsing input document")?;

    let key_file_path = key_file.to_str().context("key file path is not valid UTF-8")?;
    let key_manager = StaticKeyManager::from_file(key_file_path).context("loading key file")?;
    let factory = StandardTransformFactory::new();
    let ctx = ProcessingContext::new(&key_manager, &factory);

    let target_path = xml_dom::find_path_by_tag(&root, "EncryptedData").context("no EncryptedData element found in input document")?;

    xmlenc::decrypt(&mut root, &target_path, &ctx, None).context("decrypting target element")?;

    let dumped = xml_dom::dump_element(&root).context("serializing result document")?;
    fs::write(output, dumped).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}
