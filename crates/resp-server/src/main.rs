//!
//! HTTP-сервис и CLI анализа респираторных звуков (RustResp).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use resp_core::{ModelType, ServerConfig};
use resp_engine::RespEngine;
use resp_pipeline::RespPipeline;
use resp_server::{routes, SharedPipeline};

/// Тип модели для CLI.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ModelTypeArg {
    /// ONNX Runtime (модель, экспортированная из TensorFlow/Keras)
    Onnx,
    /// RespNet на candle (safetensors)
    Respnet,
}

impl ModelTypeArg {
    fn to_model_type(self) -> ModelType {
        match self {
            ModelTypeArg::Onnx => ModelType::Onnx,
            ModelTypeArg::Respnet => ModelType::RespNet,
        }
    }
}

#[derive(Parser)]
#[command(name = "respserver")]
#[command(author, version, about = "RustResp: Respiratory Sound Analysis", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Запустить HTTP-сервис анализа
    Serve {
        /// Path to the model directory
        #[arg(long)]
        model: PathBuf,

        /// Тип модели: onnx (по умолчанию) или respnet
        #[arg(long, value_enum, default_value = "onnx")]
        model_type: ModelTypeArg,

        /// Device to use (cpu, metal, cuda)
        #[arg(long, default_value = "cpu")]
        device: String,

        /// Адрес для bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Порт (переменная окружения PORT имеет приоритет над дефолтом)
        #[arg(long, env = "PORT", default_value_t = 4567)]
        port: u16,
    },

    /// Разовый анализ файла без поднятия сервера
    Analyze {
        /// Path to the model directory
        #[arg(long)]
        model: PathBuf,

        /// Тип модели: onnx (по умолчанию) или respnet
        #[arg(long, value_enum, default_value = "onnx")]
        model_type: ModelTypeArg,

        /// Device to use (cpu, metal, cuda)
        #[arg(long, default_value = "cpu")]
        device: String,

        /// Path to the audio file
        #[arg(long)]
        audio: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            model,
            model_type,
            device,
            host,
            port,
        } => {
            println!("🫁 RustResp - Respiratory Sound Analysis");
            println!("=========================================");
            println!("Model: {}", model.display());
            println!("Model type: {:?}", model_type);
            println!("Device: {}", device);
            println!();

            let pipeline = load_pipeline(&model, model_type, &device)?;
            let config = ServerConfig { host, port };
            serve(pipeline, &config).await
        }

        Commands::Analyze {
            model,
            model_type,
            device,
            audio,
        } => {
            println!("🫁 RustResp - Respiratory Sound Analysis");
            println!("=========================================");
            println!("Model: {}", model.display());
            println!("Audio file: {}", audio.display());
            println!();

            let start = Instant::now();
            let pipeline = load_pipeline(&model, model_type, &device)?;

            let bytes = std::fs::read(&audio)?;
            let report = {
                let mut guard = match pipeline.lock() {
                    Ok(g) => g,
                    Err(poisoned) => poisoned.into_inner(),
                };
                guard.analyze_bytes(&bytes)?
            };

            println!("{}", serde_json::to_string_pretty(&report)?);
            println!();
            println!("⏱️  Done in {:.2}s", start.elapsed().as_secs_f64());
            Ok(())
        }
    }
}

fn load_pipeline(
    model: &PathBuf,
    model_type: ModelTypeArg,
    device: &str,
) -> Result<SharedPipeline> {
    let device = create_device(device)?;

    println!("🧠 Loading model...");
    let start = Instant::now();
    let engine = RespEngine::load(model_type.to_model_type(), model, &device)?;
    println!(
        "   Model: {} (loaded in {:.2}s)",
        engine.name(),
        start.elapsed().as_secs_f64()
    );

    Ok(Arc::new(Mutex::new(RespPipeline::new(engine))))
}

async fn serve(pipeline: SharedPipeline, config: &ServerConfig) -> Result<()> {
    let app = routes::router(pipeline);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    println!("🌐 Listening on http://{}", addr);
    println!("   POST /analyze (multipart field 'file')");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn create_device(device: &str) -> Result<candle_core::Device> {
    match device {
        "metal" => {
            // candle может panic при инициализации Metal, если устройство
            // недоступно. Панику ловим, hook временно глушим.
            let prev_hook = std::panic::take_hook();
            std::panic::set_hook(Box::new(|_| {}));
            let res = std::panic::catch_unwind(|| candle_core::Device::new_metal(0));
            std::panic::set_hook(prev_hook);

            match res {
                Ok(Ok(dev)) => Ok(dev),
                Ok(Err(e)) => Err(e.into()),
                Err(_) => Err(anyhow::anyhow!(
                    "Инициализация Metal недоступна в этом окружении. Попробуйте --device cpu."
                )),
            }
        }
        "cuda" => Ok(candle_core::Device::new_cuda(0)?),
        _ => Ok(candle_core::Device::Cpu),
    }
}
