use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
mod auth;
use cipherlab::catalog::{self, Category};
use cipherlab::{
    AesBundle, KdfParams, ParamKind, ParamValue, Params, Storage, aes_decrypt_with_kdf,
    aes_encrypt_with_kdf, decrypt_with_cipher, encrypt_with_cipher, get_cipher_info,
};
use std::path::PathBuf;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, clap::Args)]
struct ScryptArgs {
    /// Scrypt cost as log2(N) (default: 14)
    #[arg(long = "scrypt-log-n")]
    log_n: Option<u8>,

    /// Scrypt block size r (default: 8)
    #[arg(long = "scrypt-r")]
    r: Option<u32>,

    /// Scrypt parallelism p (default: 1)
    #[arg(long = "scrypt-p")]
    p: Option<u32>,
}

impl ScryptArgs {
    fn to_kdf_params(&self) -> Result<KdfParams> {
        let default = KdfParams::default();

        KdfParams::new(
            self.log_n.unwrap_or(default.log_n()),
            self.r.unwrap_or(default.r()),
            self.p.unwrap_or(default.p()),
        )
    }
}

/// Parses `NAME=VALUE`; integer values become numbers.
fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    if name.is_empty() {
        return Err(format!("missing parameter name in '{raw}'"));
    }
    Ok((name.to_string(), ParamValue::parse_loose(value)))
}

#[derive(Debug, Parser)]
#[command(name = "cipherlab")]
#[command(
    version,
    about = "Educational catalog of classic text ciphers, plus password-based AES-256-GCM."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Lists catalog entries
    List {
        /// Only show one category (classic or variant)
        #[arg(long)]
        category: Option<Category>,

        /// Case-insensitive match on slug or name
        #[arg(short, long)]
        query: Option<String>,

        /// Only show ciphers whose decrypt recovers the plaintext
        #[arg(long, default_value_t = false)]
        reversible: bool,
    },

    /// Shows metadata for one cipher
    #[command(arg_required_else_help = true)]
    Info {
        slug: String,

        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Encrypts text with a classic cipher
    #[command(arg_required_else_help = true)]
    Encrypt {
        slug: String,
        text: String,

        /// Cipher parameter, repeatable (e.g. -p shift=7)
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
    },

    /// Decrypts text with a classic cipher
    #[command(arg_required_else_help = true)]
    Decrypt {
        slug: String,
        text: String,

        /// Cipher parameter, repeatable (e.g. -p key=LEMON)
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_param)]
        params: Vec<(String, ParamValue)>,
    },

    /// Encrypts text with AES-256-GCM under a password
    #[command(arg_required_else_help = true)]
    AesEncrypt {
        text: String,

        /// Write the bundle to PATH instead of stdout
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        #[command(flatten)]
        scrypt: ScryptArgs,
    },

    /// Decrypts an AES bundle given inline or from a file
    AesDecrypt {
        /// Bundle JSON
        json: Option<String>,

        /// Read the bundle from PATH
        #[arg(long, value_name = "PATH", env = "CIPHERLAB_BUNDLE")]
        file: Option<PathBuf>,

        #[command(flatten)]
        scrypt: ScryptArgs,
    },
}

fn init_tracing() {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .finish();

    // a subscriber already installed is not fatal
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let args = Cli::parse();
    match args.command {
        Commands::List {
            category,
            query,
            reversible,
        } => {
            let entries: Vec<_> = catalog::search(query.as_deref(), category)
                .into_iter()
                .filter(|e| !reversible || e.reversible)
                .collect();

            if entries.is_empty() {
                println!("No ciphers found.");
                return Ok(());
            }

            let slug_width = entries
                .iter()
                .map(|e| e.slug.len())
                .chain(std::iter::once("Slug".len()))
                .max()
                .unwrap_or_default();

            let name_width = entries
                .iter()
                .map(|e| e.name.chars().count())
                .chain(std::iter::once("Name".len()))
                .max()
                .unwrap_or_default();

            println!(
                "{:<slug_width$}  {:<name_width$}  {:<8}  Decrypt",
                "Slug", "Name", "Category"
            );
            println!("{:-<slug_width$}  {:-<name_width$}  {:-<8}  -------", "", "", "");

            for e in &entries {
                println!(
                    "{:<slug_width$}  {:<name_width$}  {:<8}  {}",
                    e.slug,
                    e.name,
                    e.category.to_string(),
                    if e.reversible { "yes" } else { "no" }
                );
            }
            println!("\n{} cipher(s)", entries.len());
        }
        Commands::Info { slug, json } => {
            let Some(descriptor) = get_cipher_info(&slug) else {
                bail!("unknown cipher: {slug}");
            };
            if json {
                let out = serde_json::to_string_pretty(&descriptor)
                    .context("failed to serialize cipher info")?;
                println!("{out}");
                return Ok(());
            }

            println!("Slug:        {}", descriptor.slug());
            println!("Name:        {}", descriptor.name());
            println!("Description: {}", descriptor.description());
            let decrypt = if descriptor.is_reversible() {
                "supported"
            } else if descriptor.can_decrypt() {
                "best effort"
            } else {
                "not supported"
            };
            println!("Decrypt:     {decrypt}");
            if descriptor.params().is_empty() {
                println!("Parameters:  none");
            } else {
                println!("Parameters:");
                for spec in descriptor.params() {
                    let kind = match spec.kind {
                        ParamKind::Number => "number",
                        ParamKind::Text => "text",
                    };
                    println!("  {} ({kind})", spec.name);
                }
            }
        }
        Commands::Encrypt { slug, text, params } => {
            let params: Params = params.into_iter().collect();
            let out = encrypt_with_cipher(&slug, &text, &params)?;
            println!("{out}");
        }
        Commands::Decrypt { slug, text, params } => {
            let params: Params = params.into_iter().collect();
            let out = decrypt_with_cipher(&slug, &text, &params)?;
            println!("{out}");
        }
        Commands::AesEncrypt { text, out, scrypt } => {
            let kdf = scrypt.to_kdf_params()?;
            let password = auth::read_new_password_with_confirmation()?;
            let bundle = aes_encrypt_with_kdf(&text, &password, kdf)?;
            match out {
                Some(path) => {
                    let storage = Storage::new(path);
                    storage.save_bundle(&bundle)?;
                    println!("bundle written to {}", storage.path().display());
                }
                None => println!("{}", bundle.to_json()),
            }
        }
        Commands::AesDecrypt { json, file, scrypt } => {
            let kdf = scrypt.to_kdf_params()?;
            let bundle = match (json, file) {
                (Some(json), _) => AesBundle::from_json(&json)?,
                (None, Some(path)) => Storage::new(path).load_bundle()?,
                (None, None) => bail!("no bundle given: pass the JSON or --file PATH"),
            };
            let password = auth::read_password()?;
            let plaintext = aes_decrypt_with_kdf(&bundle, &password, kdf)?;
            println!("{plaintext}");
        }
    }

    Ok(())
}
