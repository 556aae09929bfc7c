use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use bnc_client::api::BroadcastResult;
use bnc_client::config::default_api_url;
use bnc_client::{
    parse_envelope, sign_transaction, ApiClient, ClientConfig, OutputFormat, SignSource,
    SigningConfig, TokenAction, TransactionBuilder, TxAction,
};
use bnc_crypto::KeyPair;
use bnc_types::msgs::{DecimalCoin, MultiSendOutput, Side, TimeInForce};
use bnc_types::Network;

#[derive(Parser)]
#[command(
    name = "bnc",
    about = "Build, sign and broadcast Binance Chain transactions",
    version,
    author
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    #[arg(long, global = true, value_name = "NETWORK", help = "Network (mainnet, testnet)")]
    network: Option<Network>,

    #[arg(long, global = true, value_name = "URL", help = "HTTP API endpoint")]
    api_url: Option<String>,

    #[arg(long, global = true, value_name = "DIR", help = "Directory holding config.toml")]
    home: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Build an unsigned transaction and print its envelope")]
    Tx {
        #[arg(long, global = true, value_name = "N", help = "Account number")]
        account_number: Option<u64>,

        #[arg(long, global = true, value_name = "N", help = "Current account sequence")]
        sequence: Option<u64>,

        #[arg(long, global = true, value_name = "TEXT", help = "Transaction memo")]
        memo: Option<String>,

        #[command(subcommand)]
        kind: TxCommands,
    },

    #[command(about = "Decode an unsigned envelope")]
    Inspect {
        #[arg(value_name = "ENVELOPE", help = "Hex envelope, or - to read stdin")]
        envelope: String,
    },

    #[command(about = "Sign an unsigned envelope")]
    Sign {
        #[arg(long, value_name = "HEX", help = "Private key as 32 hex-encoded bytes")]
        private_key: String,

        #[arg(long, help = "Skip verifying the signature before assembling the transaction")]
        no_verify: bool,

        #[arg(value_name = "ENVELOPE", help = "Hex envelope, or - to read stdin")]
        envelope: String,
    },

    #[command(about = "Broadcast a signed transaction")]
    Broadcast {
        #[arg(value_name = "HEX", help = "Signed transaction hex, or - to read stdin")]
        tx: String,

        #[arg(long = "async", help = "Return without waiting for the check result")]
        no_wait: bool,
    },

    #[command(about = "Configuration management")]
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum TxCommands {
    #[command(about = "Send one coin to one address")]
    Transfer {
        #[arg(long, value_name = "ADDRESS")]
        from: String,
        #[arg(long, value_name = "ADDRESS")]
        to: String,
        #[arg(long, value_name = "DECIMAL")]
        amount: String,
        #[arg(long, value_name = "SYMBOL")]
        denom: String,
    },

    #[command(about = "Send coins to several addresses")]
    MultiSend {
        #[arg(long, value_name = "ADDRESS")]
        from: String,
        #[arg(
            long = "output",
            required = true,
            value_name = "ADDRESS=AMOUNT:DENOM[,AMOUNT:DENOM]",
            value_parser = parse_output
        )]
        outputs: Vec<MultiSendOutput>,
    },

    #[command(about = "Cancel an open order")]
    CancelOrder {
        #[arg(long, value_name = "ADDRESS")]
        sender: String,
        #[arg(long, value_name = "PAIR")]
        symbol: String,
        #[arg(long, value_name = "ORDER_ID")]
        refid: String,
    },

    #[command(about = "Place a limit order")]
    PlaceOrder {
        #[arg(long, value_name = "ADDRESS")]
        sender: String,
        #[arg(long, value_name = "PAIR")]
        symbol: String,
        #[arg(long, value_name = "SIDE", help = "buy or sell")]
        side: Side,
        #[arg(long, value_name = "DECIMAL")]
        price: String,
        #[arg(long, value_name = "DECIMAL")]
        quantity: String,
        #[arg(long, value_name = "TIF", default_value = "gtc", help = "gtc or ioc")]
        time_in_force: TimeInForce,
    },

    #[command(about = "List a trading pair approved by proposal")]
    List {
        #[arg(long, value_name = "ADDRESS")]
        from: String,
        #[arg(long, value_name = "ID")]
        proposal_id: i64,
        #[arg(long, value_name = "SYMBOL")]
        base_asset: String,
        #[arg(long, value_name = "SYMBOL")]
        quote_asset: String,
        #[arg(long, value_name = "DECIMAL")]
        init_price: String,
    },

    #[command(about = "Issue a new token")]
    Issue {
        #[arg(long, value_name = "ADDRESS")]
        from: String,
        #[arg(long, value_name = "NAME")]
        name: String,
        #[arg(long, value_name = "SYMBOL")]
        symbol: String,
        #[arg(long, value_name = "DECIMAL")]
        total_supply: String,
        #[arg(long)]
        mintable: bool,
    },

    #[command(about = "Freeze tokens")]
    Freeze(TokenArgs),

    #[command(about = "Unfreeze tokens")]
    Unfreeze(TokenArgs),

    #[command(about = "Burn tokens")]
    Burn(TokenArgs),

    #[command(about = "Mint tokens")]
    Mint(TokenArgs),
}

#[derive(Args)]
struct TokenArgs {
    #[arg(long, value_name = "ADDRESS")]
    from: String,
    #[arg(long, value_name = "SYMBOL")]
    symbol: String,
    #[arg(long, value_name = "DECIMAL")]
    amount: String,
}

impl From<TokenArgs> for TokenAction {
    fn from(args: TokenArgs) -> Self {
        TokenAction {
            from: args.from,
            symbol: args.symbol,
            amount: args.amount,
        }
    }
}

impl From<TxCommands> for TxAction {
    fn from(cmd: TxCommands) -> Self {
        match cmd {
            TxCommands::Transfer {
                from,
                to,
                amount,
                denom,
            } => TxAction::Transfer {
                from,
                to,
                amount,
                denom,
            },
            TxCommands::MultiSend { from, outputs } => TxAction::MultiSend { from, outputs },
            TxCommands::CancelOrder {
                sender,
                symbol,
                refid,
            } => TxAction::CancelOrder {
                sender,
                symbol,
                refid,
            },
            TxCommands::PlaceOrder {
                sender,
                symbol,
                side,
                price,
                quantity,
                time_in_force,
            } => TxAction::PlaceOrder {
                sender,
                symbol,
                side,
                price,
                quantity,
                time_in_force,
            },
            TxCommands::List {
                from,
                proposal_id,
                base_asset,
                quote_asset,
                init_price,
            } => TxAction::List {
                from,
                proposal_id,
                base_asset,
                quote_asset,
                init_price,
            },
            TxCommands::Issue {
                from,
                name,
                symbol,
                total_supply,
                mintable,
            } => TxAction::Issue {
                from,
                name,
                symbol,
                total_supply,
                mintable,
            },
            TxCommands::Freeze(args) => TxAction::Freeze(args.into()),
            TxCommands::Unfreeze(args) => TxAction::Unfreeze(args.into()),
            TxCommands::Burn(args) => TxAction::Burn(args.into()),
            TxCommands::Mint(args) => TxAction::Mint(args.into()),
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommands {
    #[command(about = "Show current configuration")]
    Show,

    #[command(about = "Set a configuration value")]
    Set {
        #[arg(value_name = "KEY", help = "network, api_url, timeout or output")]
        key: String,
        #[arg(value_name = "VALUE")]
        value: String,
    },

    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(long, help = "Overwrite an existing configuration")]
        force: bool,
    },
}

/// Effective settings: command-line flag, then config file, then default
struct Settings {
    config: ClientConfig,
    network: Network,
    api_url: String,
    home: Option<PathBuf>,
}

impl Settings {
    fn resolve(args: &GlobalArgs) -> Result<Self> {
        let config = ClientConfig::load_or_default(args.home.as_deref())
            .context("failed to load configuration")?;
        let network = args.network.unwrap_or(config.network);
        let api_url = match &args.api_url {
            Some(url) => url.clone(),
            // A stock endpoint follows the selected network.
            None if Network::ALL
                .into_iter()
                .any(|n| default_api_url(n) == config.api_url) =>
            {
                default_api_url(network).to_string()
            }
            None => config.api_url.clone(),
        };
        Ok(Self {
            config,
            network,
            api_url,
            home: args.home.clone(),
        })
    }

    fn output(&self) -> OutputFormat {
        self.config.output
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.global.verbose)?;

    match cli.command {
        // Runs without loading the file it may be replacing.
        Commands::Config {
            command: ConfigCommands::Init { force },
        } => init_config(cli.global.home.as_deref(), force),
        command => run(&Settings::resolve(&cli.global)?, command).await,
    }
}

async fn run(ctx: &Settings, command: Commands) -> Result<()> {
    match command {
        Commands::Tx {
            account_number,
            sequence,
            memo,
            kind,
        } => tx_command(ctx, account_number, sequence, memo, kind.into()),
        Commands::Inspect { envelope } => inspect_command(ctx, &envelope),
        Commands::Sign {
            private_key,
            no_verify,
            envelope,
        } => sign_command(ctx, &private_key, !no_verify, &envelope),
        Commands::Broadcast { tx, no_wait } => broadcast_command(ctx, &tx, !no_wait).await,
        Commands::Config { command } => config_command(ctx, command),
    }
}

fn setup_logging(verbose: bool) -> Result<()> {
    bnc_log::init(verbose).map_err(|e| anyhow::anyhow!("failed to initialize logging: {e}"))
}

fn tx_command(
    ctx: &Settings,
    account_number: Option<u64>,
    sequence: Option<u64>,
    memo: Option<String>,
    action: TxAction,
) -> Result<()> {
    let mut builder = TransactionBuilder::new(ctx.network).memo(memo.unwrap_or_default());
    if let Some(n) = account_number {
        builder = builder.account_number(n);
    }
    if let Some(n) = sequence {
        builder = builder.sequence(n);
    }

    let envelope = builder.create_envelope(&action)?;
    match ctx.output() {
        OutputFormat::Text => println!("{envelope}"),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({
                "msg_type": action.type_name().as_str(),
                "network": ctx.network,
                "envelope": envelope,
            })
        ),
    }
    Ok(())
}

fn inspect_command(ctx: &Settings, envelope: &str) -> Result<()> {
    let tx = parse_envelope(&read_arg(envelope)?)?;
    let sign_doc = String::from_utf8(tx.sign_doc.sign_bytes()?)?;

    match ctx.output() {
        OutputFormat::Text => {
            println!("msg_type: {}", tx.msg_type);
            println!("network: {}", tx.network);
            println!("chain_id: {}", tx.chain_id);
            println!("account_number: {}", tx.account_number);
            println!("sequence: {}", tx.sequence);
            println!("memo: {}", tx.memo);
            println!("sign_doc: {sign_doc}");
        }
        OutputFormat::Json => {
            let doc: serde_json::Value = serde_json::from_str(&sign_doc)?;
            println!(
                "{}",
                serde_json::json!({
                    "msg_type": tx.msg_type.as_str(),
                    "network": tx.network,
                    "account_number": tx.account_number,
                    "sequence": tx.sequence,
                    "memo": tx.memo,
                    "sign_doc": doc,
                })
            );
        }
    }
    Ok(())
}

fn sign_command(ctx: &Settings, private_key: &str, verify: bool, envelope: &str) -> Result<()> {
    let key = KeyPair::from_hex(private_key)?;
    let envelope = read_arg(envelope)?;
    let config = SigningConfig {
        verify_signature: verify,
    };
    let signed = sign_transaction(&key, SignSource::Envelope(&envelope), &config)?;

    tracing::info!(
        signer = %key.address_string(ctx.network)?,
        tx_hash = %signed.tx_hash,
        "signed transaction"
    );
    match ctx.output() {
        OutputFormat::Text => println!("{}", signed.hex),
        OutputFormat::Json => println!(
            "{}",
            serde_json::json!({"hex": signed.hex, "tx_hash": signed.tx_hash})
        ),
    }
    Ok(())
}

async fn broadcast_command(ctx: &Settings, tx: &str, sync: bool) -> Result<()> {
    let tx = read_arg(tx)?;
    let client = ApiClient::new(&ctx.api_url, Duration::from_secs(ctx.config.timeout))?;
    let results = client.broadcast_tx(&tx, sync).await?;

    for BroadcastResult { hash, code, log, ok } in results {
        match ctx.output() {
            OutputFormat::Text => println!("{hash} code={code} ok={ok} {log}"),
            OutputFormat::Json => println!(
                "{}",
                serde_json::json!({"hash": hash, "code": code, "ok": ok, "log": log})
            ),
        }
    }
    Ok(())
}

fn config_command(ctx: &Settings, command: ConfigCommands) -> Result<()> {
    let home = ctx.home.as_deref();
    match command {
        ConfigCommands::Show => {
            let effective = ClientConfig {
                network: ctx.network,
                api_url: ctx.api_url.clone(),
                ..ctx.config.clone()
            };
            print!("{}", toml::to_string_pretty(&effective)?);
        }
        ConfigCommands::Set { key, value } => {
            let mut config = ctx.config.clone();
            config.set(&key, &value)?;
            save_config(&config, home)?;
            tracing::info!(%key, %value, "configuration updated");
        }
        ConfigCommands::Init { force } => init_config(home, force)?,
    }
    Ok(())
}

fn init_config(home: Option<&Path>, force: bool) -> Result<()> {
    ClientConfig::init(home, force).context("failed to initialize configuration")?;
    println!("{}", ClientConfig::config_file(home).display());
    Ok(())
}

fn save_config(config: &ClientConfig, home: Option<&Path>) -> Result<()> {
    let path = ClientConfig::config_file(home);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    config.save_to_file(&path)?;
    Ok(())
}

/// The argument itself, or stdin when it is `-`
fn read_arg(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.trim().to_string());
    }
    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    Ok(input.trim().to_string())
}

/// Parse `ADDRESS=AMOUNT:DENOM[,AMOUNT:DENOM...]`
fn parse_output(s: &str) -> std::result::Result<MultiSendOutput, String> {
    let (to, coins) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ADDRESS=AMOUNT:DENOM, got {s:?}"))?;
    let coins = coins
        .split(',')
        .map(|coin| {
            coin.split_once(':')
                .map(|(amount, denom)| DecimalCoin {
                    denom: denom.to_string(),
                    amount: amount.to_string(),
                })
                .ok_or_else(|| format!("expected AMOUNT:DENOM, got {coin:?}"))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(MultiSendOutput {
        to: to.to_string(),
        coins,
    })
}
