//! CLI for RoomViz - AI interior reconstruction.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use roomviz::image::ImageFormat;
use roomviz::renovation::{UNKNOWN_MIME, PALETTE};
use roomviz::{Config, InteriorStyle, TransformGateway, TransformInput, TransformResult, UploadCandidate};

#[derive(Parser)]
#[command(name = "roomviz")]
#[command(about = "Renovate room photos in a chosen interior style via Gemini")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the upload form and API
    Serve(ServeArgs),

    /// Transform a single photo
    Transform(TransformArgs),

    /// List interior styles and wall colours
    Styles,

    /// Check configuration and API reachability
    Check,
}

#[derive(Args)]
struct ServeArgs {
    /// Listen address (overrides BIND_ADDR)
    #[arg(long)]
    addr: Option<SocketAddr>,
}

#[derive(Args)]
struct TransformArgs {
    /// Room photo (PNG, JPEG or WebP)
    input: PathBuf,

    /// Output file path (defaults to the suggested download name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Interior style, e.g. "scandinavian" or "Mid-Century Modern"
    #[arg(short, long)]
    style: Option<String>,

    /// Wall colour as #RRGGBB, or "no-change"
    #[arg(short, long)]
    wall_color: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    roomviz::logger::init_logger(&cli.log_level);
    let config = Config::from_env();

    match cli.command {
        Commands::Serve(args) => {
            serve(config, args).await?;
        }
        Commands::Transform(args) => {
            transform(config, args, cli.json).await?;
        }
        Commands::Styles => {
            list_styles(cli.json)?;
        }
        Commands::Check => {
            check(config, cli.json).await?;
        }
    }

    Ok(())
}

async fn serve(mut config: Config, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    roomviz::server::serve(config).await?;
    Ok(())
}

/// Guesses the upload's MIME type from its bytes, then its extension.
fn detect_mime(path: &Path, data: &[u8]) -> String {
    ImageFormat::from_magic_bytes(data)
        .or_else(|| {
            path.extension()
                .and_then(|e| e.to_str())
                .and_then(ImageFormat::from_extension)
        })
        .map(|f| f.mime_type().to_string())
        .unwrap_or_else(|| UNKNOWN_MIME.to_string())
}

async fn transform(config: Config, args: TransformArgs, json_output: bool) -> anyhow::Result<()> {
    let data = std::fs::read(&args.input)?;
    let mime_type = detect_mime(&args.input, &data);

    let gateway = TransformGateway::from_config(&config);
    let input = TransformInput {
        upload: Some(UploadCandidate::new(data, mime_type)),
        style: args.style,
        wall_color: args.wall_color,
    };

    let done = match gateway.transform_input(input).await {
        TransformResult::Success(done) => done,
        TransformResult::Failure(failure) => {
            if json_output {
                let result = serde_json::json!({
                    "success": false,
                    "kind": failure.kind,
                    "error": failure.reason,
                });
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
            anyhow::bail!(failure.reason);
        }
    };

    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(done.download_filename()));
    done.image.save(&output)?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "output": output.display().to_string(),
            "size_bytes": done.image.size(),
            "mime_type": done.image.mime_type,
            "style": done.options.style.as_str(),
            "wall_color": done.options.wall_color.as_str(),
            "model": done.image.metadata.model,
            "duration_ms": done.image.metadata.duration_ms,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Generated visualization: {} ({} bytes, {})",
            output.display(),
            done.image.size(),
            done.options.style
        );
        if let Some(duration) = done.image.metadata.duration_ms {
            println!("Duration: {}ms", duration);
        }
    }

    Ok(())
}

fn list_styles(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct StyleInfo {
        value: &'static str,
        slug: String,
    }

    let styles: Vec<StyleInfo> = InteriorStyle::ALL
        .iter()
        .map(|s| StyleInfo {
            value: s.as_str(),
            slug: s.slug(),
        })
        .collect();

    if json_output {
        let result = serde_json::json!({
            "styles": styles,
            "wallColors": PALETTE,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Interior styles:\n");
        for s in &styles {
            println!("  {:<22} ({})", s.value, s.slug);
        }
        println!("\nWall colours:\n");
        for c in PALETTE.iter() {
            println!("  {:<10} {}", c.value, c.label);
        }
    }

    Ok(())
}

async fn check(config: Config, json_output: bool) -> anyhow::Result<()> {
    let gateway = TransformGateway::from_config(&config);
    let reachable = gateway.health_check().await;

    if json_output {
        let result = serde_json::json!({
            "credentialConfigured": gateway.is_configured(),
            "model": config.model.as_str(),
            "baseUrl": config.base_url,
            "reachable": reachable.is_ok(),
            "error": reachable.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let status = |ok: bool| if ok { "✓" } else { "✗" };
        println!("{} credential configured", status(gateway.is_configured()));
        println!("  model: {}", config.model.as_str());
        println!("  endpoint: {}", config.base_url);
        match &reachable {
            Ok(()) => println!("{} API reachable", status(true)),
            Err(e) => println!("{} API unreachable: {}", status(false), e),
        }
    }

    reachable?;
    Ok(())
}
