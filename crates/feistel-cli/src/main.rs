//! Command-line interface for the hash-based Feistel cipher.

#![forbid(unsafe_code)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use feistel_core::{IteratedHash, KdfParams, KeyDerivation, MasterKey, Salt, Sha256, KDF_ITERATIONS};
use feistel_interop::{score_password, HybridEnvelope};
use feistel_modes::{
    decrypt_message, encrypt_message, CipherParams, FeistelCipher, KdfId, KeyHeader, Mode,
};
use rand::{CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

const DEMO_PASSWORD: &str = "MySecretPassword123";
const DEMO_MESSAGE: &str = "This is a test message for our custom Feistel cipher implementation.";

/// Feistel cipher CLI.
#[derive(Parser)]
#[command(
    name = "feistel",
    version,
    author,
    about = "Hash-based Feistel block cipher with ECB/CBC/CTR modes"
)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a key header holding a fresh salt and the cipher parameters.
    Keygen {
        /// Output path for the serialized header.
        #[arg(long, value_name = "FILE")]
        out: PathBuf,
        /// Mode of operation (ecb, cbc, ctr).
        #[arg(long, default_value_t = Mode::Cbc)]
        mode: Mode,
        /// Re-hash iterations for the iterated SHA-256 derivation.
        #[arg(long, default_value_t = KDF_ITERATIONS)]
        iterations: u32,
        /// Derive keys with Argon2id instead of iterated SHA-256.
        #[arg(long, default_value_t = false)]
        argon2: bool,
        /// Optional RNG seed for a reproducible salt.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt a file into a base64 envelope.
    Enc {
        /// Key header written by `keygen`.
        #[arg(long, value_name = "FILE")]
        header: PathBuf,
        /// Password the key is derived from.
        #[arg(long, env = "FEISTEL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Plaintext input.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Envelope output.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
        /// Optional RNG seed for a reproducible IV.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Decrypt a base64 envelope.
    Dec {
        /// Key header written by `keygen`.
        #[arg(long, value_name = "FILE")]
        header: PathBuf,
        /// Password the key is derived from.
        #[arg(long, env = "FEISTEL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Envelope input.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
        /// Plaintext output.
        #[arg(long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Round-trip random messages through every mode.
    Check {
        /// Number of random messages per mode.
        #[arg(long, default_value_t = 4)]
        samples: usize,
        /// Optional RNG seed for reproducibility.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Encrypt and decrypt the reference message under a fixed salt and IV.
    Demo,
    /// Rate a password as Weak, Moderate or Strong.
    Strength {
        /// Password to score.
        password: String,
    },
    /// Print the field sizes of a length-prefixed hybrid envelope.
    HybridInspect {
        /// Framed envelope file.
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Keygen {
            out,
            mode,
            iterations,
            argon2,
            seed,
        } => cmd_keygen(&out, mode, iterations, argon2, seed),
        Commands::Enc {
            header,
            password,
            input,
            output,
            seed,
        } => cmd_enc(&header, &password, &input, &output, seed),
        Commands::Dec {
            header,
            password,
            input,
            output,
        } => cmd_dec(&header, &password, &input, &output),
        Commands::Check { samples, seed } => cmd_check(samples, seed),
        Commands::Demo => cmd_demo(),
        Commands::Strength { password } => {
            println!("{}", score_password(&password));
            Ok(())
        }
        Commands::HybridInspect { input } => cmd_hybrid_inspect(&input),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_keygen(
    out: &Path,
    mode: Mode,
    iterations: u32,
    argon2: bool,
    seed: Option<u64>,
) -> Result<()> {
    let kdf = if argon2 {
        let params = KdfParams::default();
        KdfId::Argon2id {
            mem_cost_kib: params.mem_cost_kib,
            time_cost: params.time_cost,
            parallelism: params.parallelism,
        }
    } else {
        KdfId::IteratedSha256 { iterations }
    };
    let params = CipherParams {
        kdf,
        ..CipherParams::with_mode(mode)
    };
    if !params.kdf.within_limits() {
        bail!("key-derivation cost exceeds header limits: {:?}", params.kdf);
    }
    let salt = Salt::random(&mut seeded_rng(seed));
    let header = KeyHeader::new(params, salt);
    let bytes = header.to_bytes().context("serialize key header")?;
    fs::write(out, bytes).with_context(|| format!("write {}", out.display()))?;
    tracing::info!(%mode, path = %out.display(), "wrote key header");
    Ok(())
}

fn cmd_enc(
    header_path: &Path,
    password: &str,
    input_path: &Path,
    output_path: &Path,
    seed: Option<u64>,
) -> Result<()> {
    let cipher = load_cipher(header_path, password)?;
    let data = fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?;
    let envelope = cipher.encrypt_with_rng(&data, &mut seeded_rng(seed));
    fs::write(output_path, format!("{envelope}\n"))
        .with_context(|| format!("write {}", output_path.display()))?;
    Ok(())
}

fn cmd_dec(
    header_path: &Path,
    password: &str,
    input_path: &Path,
    output_path: &Path,
) -> Result<()> {
    let cipher = load_cipher(header_path, password)?;
    let envelope = fs::read_to_string(input_path)
        .with_context(|| format!("read {}", input_path.display()))?;
    let plaintext = cipher.decrypt(&envelope).context("decrypt envelope")?;
    fs::write(output_path, plaintext)
        .with_context(|| format!("write {}", output_path.display()))?;
    Ok(())
}

fn cmd_check(samples: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seeded_rng(seed);
    for mode in Mode::ALL {
        for _ in 0..samples {
            let mut key_bytes = [0u8; 32];
            let mut iv = [0u8; 16];
            rng.fill_bytes(&mut key_bytes);
            rng.fill_bytes(&mut iv);
            let key = MasterKey::from(key_bytes);

            let mut message = vec![0u8; (rng.next_u32() % 200) as usize];
            rng.fill_bytes(&mut message);

            let ciphertext = encrypt_message::<Sha256>(&message, &key, &iv, mode);
            let recovered = decrypt_message::<Sha256>(&ciphertext, &key, &iv, mode)
                .with_context(|| format!("{mode} decryption"))?;
            if recovered != message {
                bail!("{mode} round trip mismatch for a {}-byte message", message.len());
            }
        }
    }
    println!("ok: {samples} samples per mode");
    Ok(())
}

fn cmd_demo() -> Result<()> {
    let salt = Salt([0x5a; 16]);
    let iv = [0x24; 16];
    let cipher = FeistelCipher::with_salt(DEMO_PASSWORD, salt, Mode::Cbc)?;

    let envelope = cipher.encrypt_with_iv(DEMO_MESSAGE.as_bytes(), &iv);
    let decrypted = String::from_utf8(cipher.decrypt(&envelope)?).context("decrypted text")?;

    println!("salt: {}", hex::encode(salt.as_bytes()));
    println!("key: {}", hex::encode(cipher.master_key().as_bytes()));
    println!("iv: {}", hex::encode(iv));
    println!("envelope: {envelope}");
    println!("decrypted: {decrypted}");
    if decrypted != DEMO_MESSAGE {
        bail!("demo roundtrip failed");
    }

    let (fresh_key, fresh_salt) = IteratedHash::new().derive_with_random_salt(DEMO_PASSWORD)?;
    println!(
        "fresh salt {} gives a different key: {}",
        hex::encode(fresh_salt.as_bytes()),
        &fresh_key != cipher.master_key()
    );
    Ok(())
}

fn cmd_hybrid_inspect(input_path: &Path) -> Result<()> {
    let bytes = fs::read(input_path).with_context(|| format!("read {}", input_path.display()))?;
    let envelope = HybridEnvelope::from_bytes(&bytes).context("parse hybrid envelope")?;
    println!("ciphertext: {} bytes", envelope.ciphertext.len());
    println!("wrapped key: {} bytes", envelope.wrapped_key.len());
    println!("iv: {}", hex::encode(&envelope.iv));
    println!("tag: {}", hex::encode(&envelope.tag));
    Ok(())
}

fn load_header(path: &Path) -> Result<KeyHeader> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let header = KeyHeader::from_bytes(&bytes).context("deserialize key header")?;
    if !header.params.is_supported() {
        bail!(
            "unsupported key header (version {}, {} rounds, kdf {:?})",
            header.params.version,
            header.params.rounds,
            header.params.kdf
        );
    }
    Ok(header)
}

fn load_cipher(header_path: &Path, password: &str) -> Result<FeistelCipher> {
    let header = load_header(header_path)?;
    let kdf = header.params.kdf.build();
    FeistelCipher::from_kdf(kdf.as_ref(), password, header.salt(), header.params.mode)
        .context("derive key")
}

fn seeded_rng(seed: Option<u64>) -> impl RngCore + CryptoRng {
    match seed {
        Some(value) => {
            let mut seed_bytes = [0u8; 32];
            seed_bytes[..8].copy_from_slice(&value.to_le_bytes());
            ChaCha20Rng::from_seed(seed_bytes)
        }
        None => ChaCha20Rng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_header(dir: &Path, mode: Mode) -> PathBuf {
        let path = dir.join("key.hdr");
        cmd_keygen(&path, mode, 8, false, Some(1)).expect("keygen");
        path
    }

    #[test]
    fn cli_parses_mode_and_env_password() {
        let cli = Cli::try_parse_from([
            "feistel", "enc", "--header", "h", "--password", "pw", "--input", "i", "--output", "o",
        ])
        .expect("parse");
        assert!(matches!(cli.command, Commands::Enc { ref password, .. } if password == "pw"));

        let cli = Cli::try_parse_from(["feistel", "keygen", "--out", "k", "--mode", "ctr"])
            .expect("parse");
        assert!(matches!(cli.command, Commands::Keygen { mode: Mode::Ctr, .. }));

        assert!(Cli::try_parse_from(["feistel", "keygen", "--out", "k", "--mode", "ofb"]).is_err());
    }

    #[test]
    fn keygen_is_reproducible_with_seed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let a = load_header(&write_header(dir.path(), Mode::Cbc)).expect("header");
        let b = load_header(&write_header(dir.path(), Mode::Cbc)).expect("header");
        assert_eq!(a, b);
        assert_eq!(a.params.kdf, KdfId::IteratedSha256 { iterations: 8 });
    }

    #[test]
    fn enc_dec_round_trip_through_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        for mode in Mode::ALL {
            let header = write_header(dir.path(), mode);
            let plain = dir.path().join("plain.txt");
            let sealed = dir.path().join("sealed.b64");
            let opened = dir.path().join("opened.txt");
            fs::write(&plain, DEMO_MESSAGE).expect("write plaintext");

            cmd_enc(&header, "pw", &plain, &sealed, Some(7)).expect("enc");
            cmd_dec(&header, "pw", &sealed, &opened).expect("dec");
            assert_eq!(fs::read_to_string(&opened).expect("read"), DEMO_MESSAGE);
        }
    }

    #[test]
    fn wrong_password_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let header = write_header(dir.path(), Mode::Cbc);
        let plain = dir.path().join("plain.txt");
        let sealed = dir.path().join("sealed.b64");
        fs::write(&plain, DEMO_MESSAGE).expect("write plaintext");
        cmd_enc(&header, "right", &plain, &sealed, Some(7)).expect("enc");

        let err = cmd_dec(&header, "wrong", &sealed, &dir.path().join("out"))
            .expect_err("wrong password");
        assert!(format!("{err:#}").contains("decryption failed"));
    }

    #[test]
    fn header_with_excessive_kdf_cost_is_refused() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hostile.hdr");
        let params = CipherParams {
            kdf: KdfId::Argon2id {
                mem_cost_kib: u32::MAX,
                time_cost: 3,
                parallelism: 4,
            },
            ..CipherParams::default()
        };
        let bytes = KeyHeader::new(params, Salt([0u8; 16]))
            .to_bytes()
            .expect("serialize");
        fs::write(&path, bytes).expect("write header");

        let err = load_cipher(&path, "pw").expect_err("hostile header");
        assert!(format!("{err:#}").contains("unsupported key header"));

        let out = dir.path().join("key.hdr");
        assert!(cmd_keygen(&out, Mode::Cbc, u32::MAX, false, None).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn check_passes() {
        cmd_check(2, Some(3)).expect("check");
    }

    #[test]
    fn hybrid_inspect_reads_framed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("hybrid.bin");
        let framed = HybridEnvelope {
            ciphertext: vec![1; 10],
            wrapped_key: vec![2; 32],
            iv: vec![3; 12],
            tag: vec![4; 16],
        }
        .to_bytes()
        .expect("frame");
        fs::write(&path, &framed).expect("write");
        cmd_hybrid_inspect(&path).expect("inspect");

        fs::write(&path, &framed[..framed.len() - 1]).expect("write");
        assert!(cmd_hybrid_inspect(&path).is_err());
    }
}
