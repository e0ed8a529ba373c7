//! `fleetctl cni-config` — Validate a VPC ENI plugin config.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use fleetagent_cni::plugin::VpcEniPluginConfig;

/// Arguments for the `cni-config` command.
#[derive(Args, Debug)]
pub struct CniConfigArgs {
    /// Plugin config JSON file.
    pub file: PathBuf,

    /// Pretty-print the normalized config.
    #[arg(long)]
    pub pretty: bool,
}

/// Executes the `cni-config` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the config is invalid.
pub fn execute(args: &CniConfigArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;
    let config = VpcEniPluginConfig::from_json(&content)
        .with_context(|| format!("validating {}", args.file.display()))?;
    tracing::info!(eni = %config.eni_name, plugin = %config.plugin_type, "plugin config is valid");

    let out = if args.pretty {
        serde_json::to_string_pretty(&config)?
    } else {
        config.to_json()?
    };
    println!("{out}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn invalid_config_fails_with_field_name() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            br#"{"eniName": "eth1", "eniMACAddress": "nope",
                 "eniIPAddress": "10.0.0.2", "gatewayIPAddress": "10.0.0.1"}"#,
        )
        .expect("write config");
        let err = execute(&CniConfigArgs {
            file: file.path().to_path_buf(),
            pretty: false,
        })
        .expect_err("bad MAC should fail");
        assert!(format!("{err:#}").contains("eniMACAddress"));
    }
}
