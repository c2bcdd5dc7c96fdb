use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use ca821x_core::{Ca821x, Callbacks, DeviceConfig, DeviceFileTransport, spawn_reader};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about = "CA821x transceiver bring-up tool", long_about = None)]
struct Args {
    /// Kernel device node
    #[arg(long)]
    device: Option<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Early (MPW) silicon
    #[arg(long)]
    mpw: bool,

    /// Apply register workarounds
    #[arg(long)]
    workarounds: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Write the register defaults
    ChipInit,
    /// MLME-RESET
    Reset {
        /// Also reset the PIB to defaults
        #[arg(long)]
        default_pib: bool,
    },
    /// Read a PIB attribute
    GetPib {
        #[arg(value_parser = parse_u8)]
        attribute: u8,
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        index: u8,
    },
    /// Write a PIB attribute
    SetPib {
        #[arg(value_parser = parse_u8)]
        attribute: u8,
        /// Value as hex bytes, e.g. 5cca
        value: String,
        #[arg(long, default_value_t = 0, value_parser = parse_u8)]
        index: u8,
    },
    /// Read a transceiver register
    GetSfr {
        #[arg(value_parser = parse_u8)]
        page: u8,
        #[arg(value_parser = parse_u8)]
        address: u8,
    },
    /// Write a transceiver register
    SetSfr {
        #[arg(value_parser = parse_u8)]
        page: u8,
        #[arg(value_parser = parse_u8)]
        address: u8,
        #[arg(value_parser = parse_u8)]
        value: u8,
    },
    /// Show or set the output power in dBm
    TxPower {
        #[arg(allow_negative_numbers = true)]
        dbm: Option<i8>,
    },
    /// Log every frame the chip sends
    Listen {
        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
}

fn parse_u8(s: &str) -> Result<u8, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("{}: {}", s, e))
}

fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    let s = s.trim_start_matches("0x");
    if !s.bytes().all(|b| b.is_ascii_hexdigit()) {
        bail!("not a hex string: {}", s);
    }
    if s.len() % 2 != 0 {
        bail!("odd number of hex digits in {}", s);
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).with_context(|| format!("bad hex in {}", s)))
        .collect()
}

fn load_config(args: &Args) -> Result<DeviceConfig> {
    let mut config = match &args.config {
        Some(path) => DeviceConfig::load_from_file(path)?,
        None => DeviceConfig::default(),
    };
    if let Some(device) = &args.device {
        config.device_path = device.clone();
    }
    config.mpw |= args.mpw;
    config.workarounds |= args.workarounds;
    Ok(config)
}

fn listen(
    mut device: Ca821x<DeviceFileTransport>,
    config: &DeviceConfig,
    seconds: Option<u64>,
) -> Result<()> {
    let mut callbacks = Callbacks::new();
    callbacks
        .on_data_indication(|ind| {
            info!(src = %ind.src, lqi = ind.link_quality, len = ind.msdu.len(), "MCPS-DATA.indication");
            Ok(())
        })
        .on_data_confirm(|cnf| {
            info!(handle = cnf.msdu_handle, status = %cnf.status, "MCPS-DATA.confirm");
            Ok(())
        })
        .on_beacon_notify_indication(|ind| {
            info!(
                coord = %ind.pan_descriptor.coord,
                channel = ind.pan_descriptor.logical_channel,
                "MLME-BEACON-NOTIFY.indication"
            );
            Ok(())
        })
        .on_scan_confirm(|cnf| {
            info!(status = %cnf.status, results = cnf.result_list_size, "MLME-SCAN.confirm");
            Ok(())
        })
        .on_comm_status_indication(|ind| {
            info!(status = %ind.status, "MLME-COMM-STATUS.indication");
            Ok(())
        })
        .on_sync_loss_indication(|ind| {
            warn!(reason = %ind.loss_reason, "MLME-SYNC-LOSS.indication");
            Ok(())
        })
        .on_tdme_message_indication(|text| {
            info!("TDME message: {}", String::from_utf8_lossy(text));
            Ok(())
        })
        .on_generic(|bytes| {
            info!(frame = %format!("{:02X?}", bytes), "Upstream frame");
            Ok(())
        });
    device.register_callbacks(callbacks);

    let device = Arc::new(device);
    let reader = spawn_reader(device, config.poll_interval())?;
    let deadline = seconds.map(|s| Instant::now() + Duration::from_secs(s));
    while reader.is_running() {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }
        std::thread::sleep(Duration::from_millis(100));
    }
    reader.stop();
    Ok(())
}

fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let device = Ca821x::open(&config)?;

    match args.command {
        Cmd::ChipInit => {
            device.chip_init()?;
            println!("Chip defaults written");
        }
        Cmd::Reset { default_pib } => {
            device.mlme_reset_request(default_pib)?;
            println!("Reset complete");
        }
        Cmd::GetPib { attribute, index } => {
            let value = device.mlme_get_request(attribute, index)?;
            println!("0x{:02X}[{}] = {:02X?}", attribute, index, value);
        }
        Cmd::SetPib {
            attribute,
            value,
            index,
        } => {
            let bytes = parse_hex_bytes(&value)?;
            device.mlme_set_request(attribute, index, &bytes)?;
            println!("0x{:02X}[{}] set", attribute, index);
        }
        Cmd::GetSfr { page, address } => {
            let value = device.tdme_getsfr_request(page, address)?;
            println!("SFR {}:0x{:02X} = 0x{:02X}", page, address, value);
        }
        Cmd::SetSfr {
            page,
            address,
            value,
        } => {
            device.tdme_setsfr_request(page, address, value)?;
            println!("SFR {}:0x{:02X} <- 0x{:02X}", page, address, value);
        }
        Cmd::TxPower { dbm: Some(dbm) } => {
            device.set_tx_power((dbm as u8) & 0x3F)?;
            println!("Tx power set to {} dBm", dbm);
        }
        Cmd::TxPower { dbm: None } => {
            let txp = device.get_tx_power()?;
            let dbm = ca821x_core::hw_defaults::tx_power_dbm(txp);
            println!("Tx power {} dBm (tolerance code {})", dbm, txp >> 6);
        }
        Cmd::Listen { seconds } => listen(device, &config, seconds)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(if args.verbose {
                    tracing::Level::DEBUG.into()
                } else {
                    tracing::Level::INFO.into()
                })
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("Starting ca821x tool...");
    run(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_u8() {
        assert_eq!(parse_u8("0x4A"), Ok(0x4A));
        assert_eq!(parse_u8("13"), Ok(13));
        assert!(parse_u8("0x100").is_err());
    }

    #[test]
    fn test_parse_hex_bytes() {
        assert_eq!(parse_hex_bytes("5cca").unwrap(), vec![0x5C, 0xCA]);
        assert!(parse_hex_bytes("abc").is_err());
        assert!(parse_hex_bytes("aé0").is_err());
        assert!(parse_hex_bytes("0xzz").is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["ca821x", "--mpw", "tx-power", "-6"]).unwrap();
        assert!(args.mpw);
        assert!(matches!(args.command, Cmd::TxPower { dbm: Some(-6) }));
    }
}
