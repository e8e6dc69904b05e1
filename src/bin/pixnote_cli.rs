//! pixnote CLI: headless embed, decode, and capacity for scripts.
//! Build with: cargo build --release --bin pixnote-cli

use base64::Engine;
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

const MISSING_ENCODE_INPUT: &str = "Please provide an image and a message.";
const MISSING_DECODE_INPUT: &str = "Please provide an image.";
const DEFAULT_OUTPUT: &str = "encrypted_image.png";

fn usage() -> &'static str {
    r#"pixnote-cli — hide a short text note in an image's red channel

Usage:
  pixnote-cli embed <image> --message <string|@file> [-o <out.png>] [--json]
  pixnote-cli embed <image> --message-base64 <b64> [-o <out.png>] [--json]
  pixnote-cli decode <image> [--base64] [--json]
  pixnote-cli capacity <image>

Embed:
  --message <string>     Message as UTF-8 text
  --message @<path>      Message read from a file
  --message-base64 <b64> Message bytes as base64 (each byte stored as one character)
  -o, --output <path>    Output PNG path (default: encrypted_image.png)
  --json                 Print the outcome as JSON instead of a status line

Decode:
  Writes the recovered text to stdout. The image stores no message length, so
  the output always has one character per pixel; everything after the real
  message is leftover image data.
  --base64               Print the recovered channel bytes as base64
  --json                 Print the outcome as JSON

Capacity:
  Prints the number of characters the image can hold (its pixel count).
"#
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("{}", usage());
        std::process::exit(1);
    }
    let sub = &args[1];
    if sub == "embed" {
        if let Err(e) = run_embed(&args[2..]) {
            if e == MISSING_ENCODE_INPUT {
                eprintln!("{}", e);
            } else {
                eprintln!("embed error: {}", e);
            }
            std::process::exit(1);
        }
        return;
    }
    if sub == "decode" {
        if let Err(e) = run_decode(&args[2..]) {
            if e == MISSING_DECODE_INPUT {
                eprintln!("{}", e);
            } else {
                eprintln!("decode error: {}", e);
            }
            std::process::exit(1);
        }
        return;
    }
    if sub == "capacity" {
        if args.len() < 3 {
            eprintln!("{}", MISSING_DECODE_INPUT);
            std::process::exit(1);
        }
        if let Err(e) = run_capacity(&args[2]) {
            eprintln!("capacity error: {}", e);
            std::process::exit(1);
        }
        return;
    }
    eprintln!("{}", usage());
    std::process::exit(1);
}

fn run_embed(args: &[String]) -> Result<(), String> {
    let mut image_path: Option<&str> = None;
    let mut output: Option<&str> = None;
    let mut message_str: Option<String> = None;
    let mut message_base64: Option<String> = None;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        if a == "-o" || a == "--output" {
            i += 1;
            output = Some(args.get(i).ok_or("missing value for -o/--output")?);
        } else if a == "--message" {
            i += 1;
            let v = args.get(i).ok_or("missing value for --message")?;
            if let Some(path) = v.strip_prefix('@') {
                message_str = Some(fs::read_to_string(path).map_err(|e| e.to_string())?);
            } else {
                message_str = Some(v.clone());
            }
        } else if a == "--message-base64" {
            i += 1;
            message_base64 = Some(args.get(i).ok_or("missing value for --message-base64")?.clone());
        } else if a == "--json" {
            json = true;
        } else if !a.starts_with('-') && image_path.is_none() {
            image_path = Some(a);
        }
        i += 1;
    }

    let message: String = if let Some(b64) = message_base64 {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(b64.trim())
            .map_err(|e| e.to_string())?;
        bytes.into_iter().map(char::from).collect()
    } else {
        message_str.unwrap_or_default()
    };

    let cover_path = match image_path {
        Some(p) if !message.is_empty() => p,
        _ => return Err(MISSING_ENCODE_INPUT.to_string()),
    };
    let output_path = output.unwrap_or(DEFAULT_OUTPUT);

    if json {
        let result = pixnote::encode_image(cover_path, output_path, &message);
        let ok = result.ok;
        let line = serde_json::to_string(&result).map_err(|e| e.to_string())?;
        println!("{}", line);
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let png_bytes = pixnote::stego::encode(Path::new(cover_path), &message)?;
    fs::write(output_path, png_bytes).map_err(|e| e.to_string())?;
    eprintln!("Wrote {}", output_path);
    Ok(())
}

fn run_decode(args: &[String]) -> Result<(), String> {
    let mut image_path: Option<&str> = None;
    let mut as_base64 = false;
    let mut json = false;

    let mut i = 0;
    while i < args.len() {
        let a = &args[i];
        if a == "--base64" {
            as_base64 = true;
        } else if a == "--json" {
            json = true;
        } else if !a.starts_with('-') && image_path.is_none() {
            image_path = Some(a);
        }
        i += 1;
    }
    let path_str = image_path.ok_or(MISSING_DECODE_INPUT)?;

    if json {
        let result = pixnote::decode_image(path_str);
        let ok = result.ok;
        let line = serde_json::to_string(&result).map_err(|e| e.to_string())?;
        println!("{}", line);
        if !ok {
            std::process::exit(1);
        }
        return Ok(());
    }

    let message = pixnote::stego::decode(Path::new(path_str))?;
    let output = if as_base64 {
        let bytes: Vec<u8> = message.chars().map(|ch| u32::from(ch) as u8).collect();
        base64::engine::general_purpose::STANDARD.encode(bytes)
    } else {
        message
    };
    io::stdout().write_all(output.as_bytes()).map_err(|e| e.to_string())?;
    Ok(())
}

fn run_capacity(image_path: &str) -> Result<(), String> {
    let n = pixnote::stego::max_message_len(Path::new(image_path))?;
    println!("{}", n);
    Ok(())
}
