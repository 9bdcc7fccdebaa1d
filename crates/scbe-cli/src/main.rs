//! Command-line surface for the SS1 tokenizer and GeoSeal envelope.
//!
//! With no subcommand, runs the built-in self-test and exits `0` on pass.
//! Otherwise: `encode`, `decode`, `xlate`, `blend`, `unblend`,
//! `geoseal-encrypt`, `geoseal-decrypt`.
//!
//! Exit codes: `0` success, `1` decryption/verification failure,
//! `2` invalid arguments, `3` unknown token or lexicon error.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clap::{Parser, Subcommand};

use scbe_tongues::{blend, decode, encode, normalize, render, retokenize_text, unblend, Lexicons, Mode, Tongue};

mod selftest;

const EXIT_OK: u8 = 0;
const EXIT_VERIFY_FAILED: u8 = 1;
const EXIT_BAD_ARGS: u8 = 2;
const EXIT_TOKEN_OR_LEXICON: u8 = 3;

#[derive(Debug, Parser)]
#[command(name = "scbe", version, about = "SS1 tokenizer and GeoSeal envelope CLI")]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Cmd>,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// bytes -> token stream
    Encode {
        #[arg(long)]
        tongue: String,
        #[arg(long)]
        lexicons: Option<PathBuf>,
        #[arg(long = "in")]
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// token stream -> bytes
    Decode {
        #[arg(long)]
        tongue: String,
        #[arg(long)]
        lexicons: Option<PathBuf>,
        #[arg(long = "in")]
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// stream in src -> stream in dst plus attestation JSON
    Xlate {
        #[arg(long)]
        src: String,
        #[arg(long)]
        dst: String,
        #[arg(long, default_value = "byte")]
        mode: String,
        #[arg(long = "attest-key")]
        attest_key: Option<String>,
        #[arg(long = "in")]
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// bytes -> blended pairs JSON
    Blend {
        #[arg(long)]
        pattern: String,
        #[arg(long = "in")]
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// blended pairs JSON -> bytes
    Unblend {
        #[arg(long)]
        pattern: String,
        #[arg(long = "in")]
        input: Option<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// emits envelope JSON
    GeosealEncrypt {
        #[arg(long)]
        context: String,
        #[arg(long = "kem-key")]
        kem_key: String,
        #[arg(long = "dsa-key")]
        dsa_key: String,
        #[arg(long = "plaintext-b64")]
        plaintext_b64: Option<String>,
    },
    /// emits plaintext or exits non-zero on signature failure
    GeosealDecrypt {
        #[arg(long)]
        context: Option<String>,
        #[arg(long = "kem-key")]
        kem_key: String,
        #[arg(long = "dsa-pk")]
        dsa_pk: String,
        #[arg(long)]
        env: Option<PathBuf>,
    },
}

fn read_input(path: &Option<PathBuf>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match path {
        Some(p) => {
            std::fs::File::open(p)
                .with_context(|| format!("opening {}", p.display()))?
                .read_to_end(&mut buf)?;
        }
        None => {
            std::io::stdin().read_to_end(&mut buf)?;
        }
    }
    Ok(buf)
}

fn write_output(path: &Option<PathBuf>, data: &[u8]) -> Result<()> {
    match path {
        Some(p) => {
            std::fs::File::create(p)
                .with_context(|| format!("creating {}", p.display()))?
                .write_all(data)?;
        }
        None => {
            std::io::stdout().write_all(data)?;
        }
    }
    Ok(())
}

fn load_lexicons(_path: &Option<PathBuf>) -> Result<Lexicons> {
    // Custom lexicon tables are loaded from JSON mapping tongue code to its
    // 256-entry token table; absent --lexicons falls back to the default
    // demo generator.
    match _path {
        None => Ok(Lexicons::default_demo()),
        Some(p) => {
            let raw = std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let map: std::collections::HashMap<String, Vec<String>> =
                serde_json::from_str(&raw).context("parsing custom lexicon table")?;
            let table = scbe_tongues::CustomTable(map);
            Ok(Lexicons::build(Some(&table))?)
        }
    }
}

fn parse_tongue(s: &str) -> Result<Tongue> {
    Tongue::parse(s).ok_or_else(|| anyhow!("unknown tongue: {s}"))
}

fn parse_pattern(spec: &str) -> Result<Vec<Tongue>> {
    let mut pattern = Vec::new();
    for segment in spec.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (code, count) = match segment.split_once(':') {
            Some((c, n)) => (c, n.parse::<usize>().context("pattern repeat count")?),
            None => (segment, 1),
        };
        let tongue = parse_tongue(code)?;
        for _ in 0..count {
            pattern.push(tongue);
        }
    }
    if pattern.is_empty() {
        return Err(anyhow!("pattern must name at least one tongue"));
    }
    Ok(pattern)
}

fn run_encode(tongue: &str, lexicons: &Option<PathBuf>, input: &Option<PathBuf>, out: &Option<PathBuf>) -> Result<()> {
    let tongue = parse_tongue(tongue)?;
    let lex = load_lexicons(lexicons)?;
    let bytes = read_input(input)?;
    let tokens = encode(&lex, tongue, &bytes);
    write_output(out, render(&tokens).as_bytes())?;
    Ok(())
}

fn run_decode(tongue: &str, lexicons: &Option<PathBuf>, input: &Option<PathBuf>, out: &Option<PathBuf>) -> Result<()> {
    let tongue = parse_tongue(tongue)?;
    let lex = load_lexicons(lexicons)?;
    let text = String::from_utf8(read_input(input)?).context("token stream must be UTF-8")?;
    let tokens = normalize(&text);
    let bytes = decode(&lex, tongue, &tokens)?;
    write_output(out, &bytes)?;
    Ok(())
}

fn run_xlate(
    src: &str,
    dst: &str,
    mode: &str,
    attest_key: &Option<String>,
    input: &Option<PathBuf>,
    out: &Option<PathBuf>,
) -> Result<()> {
    let src = parse_tongue(src)?;
    let dst = parse_tongue(dst)?;
    let mode = match mode {
        "byte" => Mode::Byte,
        "semantic" => Mode::Semantic,
        other => return Err(anyhow!("unknown mode: {other}")),
    };
    let key_bytes = match attest_key {
        Some(k) => Some(BASE64.decode(k).context("decoding --attest-key")?),
        None => None,
    };
    let lex = Lexicons::default_demo();
    let text = String::from_utf8(read_input(input)?).context("token stream must be UTF-8")?;

    let (out_text, attest) =
        retokenize_text(&lex, src, dst, &text, mode, key_bytes.as_deref(), None)?;

    let payload = serde_json::json!({
        "tokens": out_text,
        "attestation": attest.to_json(),
    });
    write_output(out, format!("{}\n", payload).as_bytes())?;
    Ok(())
}

fn run_blend(pattern: &str, input: &Option<PathBuf>, out: &Option<PathBuf>) -> Result<()> {
    let pattern = parse_pattern(pattern)?;
    let lex = Lexicons::default_demo();
    let bytes = read_input(input)?;
    let pairs = blend(&lex, &pattern, &bytes);
    let json_pairs: Vec<_> = pairs
        .iter()
        .map(|(t, tok)| serde_json::json!({"tongue": t.code(), "token": tok}))
        .collect();
    write_output(out, format!("{}\n", serde_json::Value::Array(json_pairs)).as_bytes())?;
    Ok(())
}

fn run_unblend(pattern: &str, input: &Option<PathBuf>, out: &Option<PathBuf>) -> Result<()> {
    let pattern = parse_pattern(pattern)?;
    let lex = Lexicons::default_demo();
    let text = String::from_utf8(read_input(input)?).context("blended pairs must be UTF-8 JSON")?;
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).context("parsing blended pairs JSON")?;

    let mut pairs = Vec::with_capacity(parsed.len());
    for entry in parsed {
        let code = entry["tongue"].as_str().ok_or_else(|| anyhow!("pair missing tongue"))?;
        let token = entry["token"].as_str().ok_or_else(|| anyhow!("pair missing token"))?;
        pairs.push((parse_tongue(code)?, token.to_string()));
    }

    let bytes = unblend(&lex, &pattern, &pairs)?;
    write_output(out, &bytes)?;
    Ok(())
}

fn run_geoseal_encrypt(context: &str, kem_key: &str, dsa_key: &str, plaintext_b64: &Option<String>) -> Result<()> {
    let context: Vec<f64> = serde_json::from_str(context).context("parsing --context JSON")?;
    let kem_key = BASE64.decode(kem_key).context("decoding --kem-key")?;
    let dsa_key = BASE64.decode(dsa_key).context("decoding --dsa-key")?;

    let plaintext = match plaintext_b64 {
        Some(b64) => BASE64.decode(b64).context("decoding --plaintext-b64")?,
        None => {
            let mut buf = Vec::new();
            std::io::stdin().read_to_end(&mut buf)?;
            buf
        }
    };

    let kem = scbe_crypto_pqc::DemoKem::new();
    let dsa = scbe_crypto_pqc::DemoDsa::new();
    let envelope = scbe_geoseal::seal(&plaintext, &context, &kem, &dsa, &kem_key, &dsa_key, 0, 0)?;

    println!("{}", serde_json::to_string(&envelope)?);
    Ok(())
}

fn run_geoseal_decrypt(
    context: &Option<String>,
    kem_key: &str,
    dsa_pk: &str,
    env: &Option<PathBuf>,
) -> Result<ExitCode> {
    let context: Option<Vec<f64>> = match context {
        Some(c) => Some(serde_json::from_str(c).context("parsing --context JSON")?),
        None => None,
    };
    let kem_key = BASE64.decode(kem_key).context("decoding --kem-key")?;
    let dsa_pk = BASE64.decode(dsa_pk).context("decoding --dsa-pk")?;

    let env_text = String::from_utf8(read_input(env)?).context("envelope must be UTF-8 JSON")?;
    let envelope: scbe_geoseal::Envelope = serde_json::from_str(&env_text).context("parsing envelope JSON")?;

    let kem = scbe_crypto_pqc::DemoKem::new();
    let dsa = scbe_crypto_pqc::DemoDsa::new();

    match scbe_geoseal::open(&envelope, context.as_deref(), &kem, &dsa, &kem_key, &dsa_pk) {
        Ok(result) => {
            std::io::stdout().write_all(&result.plaintext.unwrap_or_default())?;
            Ok(ExitCode::from(EXIT_OK))
        }
        Err(scbe_geoseal::GeosealError::SignatureInvalid) => {
            tracing::warn!("envelope signature verification failed");
            eprintln!("signature verification failed");
            Ok(ExitCode::from(EXIT_VERIFY_FAILED))
        }
        Err(e) => Err(e.into()),
    }
}

fn cmd_name(cmd: &Cmd) -> &'static str {
    match cmd {
        Cmd::Encode { .. } => "encode",
        Cmd::Decode { .. } => "decode",
        Cmd::Xlate { .. } => "xlate",
        Cmd::Blend { .. } => "blend",
        Cmd::Unblend { .. } => "unblend",
        Cmd::GeosealEncrypt { .. } => "geoseal-encrypt",
        Cmd::GeosealDecrypt { .. } => "geoseal-decrypt",
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let Some(cmd) = cli.cmd else {
        tracing::info!("no subcommand given, running self-test");
        return match selftest::run() {
            Ok(()) => ExitCode::from(EXIT_OK),
            Err(e) => {
                eprintln!("self-test failed: {e:#}");
                ExitCode::from(EXIT_VERIFY_FAILED)
            }
        };
    };

    let _span = tracing::info_span!("subcommand", name = cmd_name(&cmd)).entered();

    let result: Result<ExitCode> = (|| {
        match &cmd {
            Cmd::Encode { tongue, lexicons, input, out } => {
                run_encode(tongue, lexicons, input, out)?;
                Ok(ExitCode::from(EXIT_OK))
            }
            Cmd::Decode { tongue, lexicons, input, out } => {
                run_decode(tongue, lexicons, input, out)?;
                Ok(ExitCode::from(EXIT_OK))
            }
            Cmd::Xlate { src, dst, mode, attest_key, input, out } => {
                run_xlate(src, dst, mode, attest_key, input, out)?;
                Ok(ExitCode::from(EXIT_OK))
            }
            Cmd::Blend { pattern, input, out } => {
                run_blend(pattern, input, out)?;
                Ok(ExitCode::from(EXIT_OK))
            }
            Cmd::Unblend { pattern, input, out } => {
                run_unblend(pattern, input, out)?;
                Ok(ExitCode::from(EXIT_OK))
            }
            Cmd::GeosealEncrypt { context, kem_key, dsa_key, plaintext_b64 } => {
                run_geoseal_encrypt(context, kem_key, dsa_key, plaintext_b64)?;
                Ok(ExitCode::from(EXIT_OK))
            }
            Cmd::GeosealDecrypt { context, kem_key, dsa_pk, env } => {
                run_geoseal_decrypt(context, kem_key, dsa_pk, env)
            }
        }
    })();

    match result {
        Ok(code) => code,
        Err(e) => {
            if e.downcast_ref::<scbe_tongues::TonguesError>().is_some() {
                eprintln!("error: {e:#}");
                ExitCode::from(EXIT_TOKEN_OR_LEXICON)
            } else {
                eprintln!("error: {e:#}");
                ExitCode::from(EXIT_BAD_ARGS)
            }
        }
    }
}
