mod cli;
mod config;
mod export;
mod form;
mod macros;
mod model;
mod preview;
mod session;
mod template;

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context};
use clap::Parser;
use config::Config;
use export::OutputFormat;
use form::Form;
use log::{debug, info, warn};
use preview::Renderer;
use session::Session;
use template::Strategy;

#[derive(Parser)]
#[command(name = env!("CARGO_BIN_NAME"))]
#[command(bin_name = env!("CARGO_BIN_NAME"))]
enum Cli {
    #[command(about = "Prints tool version")]
    #[command(long_about = None)]
    Version,

    #[command(about = "Substitute form values into the certificate template")]
    #[command(long_about = None)]
    Resolve(ResolveArgs),

    #[command(about = "Render the certificate and save it as a printable document")]
    #[command(long_about = None)]
    Preview(PreviewArgs),

    #[command(about = "Fill the certificate form interactively")]
    #[command(long_about = None)]
    Fill(FillArgs),
}

#[derive(clap::Args)]
struct CommonArgs {
    #[arg(short = 'c', long, default_value = "./config.toml")]
    config_path: PathBuf,

    /// Look up every placeholder once instead of replacing keys one by one
    #[arg(long)]
    single_pass: bool,
}

impl CommonArgs {
    fn strategy(&self) -> Strategy {
        if self.single_pass {
            Strategy::SinglePass
        } else {
            Strategy::Sequential
        }
    }
}

#[derive(clap::Args)]
struct FormArgs {
    /// JSON file with the form fields
    #[arg(long)]
    form: Option<PathBuf>,

    #[arg(long)]
    recipient_name: Option<String>,

    #[arg(long)]
    certificate_id: Option<String>,

    #[arg(long)]
    date: Option<String>,

    #[arg(long, conflicts_with_all = ["template_path", "template_name"])]
    template: Option<String>,

    #[arg(long, conflicts_with = "template_name")]
    template_path: Option<PathBuf>,

    /// Name of a template from the config
    #[arg(long)]
    template_name: Option<String>,
}

#[derive(clap::Args)]
struct ResolveArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    form: FormArgs,

    /// Print the whole certificate as JSON
    #[arg(long)]
    json: bool,

    #[arg(long)]
    out_path: Option<PathBuf>,
}

#[derive(clap::Args)]
struct PreviewArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    form: FormArgs,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Save a PDF document instead of HTML
    #[arg(long)]
    pdf: bool,
}

#[derive(clap::Args)]
struct FillArgs {
    #[command(flatten)]
    common: CommonArgs,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Save a PDF document instead of HTML
    #[arg(long)]
    pdf: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    match Cli::parse() {
        Cli::Version => {
            println!(env!("CARGO_PKG_VERSION"));
        }
        Cli::Resolve(args) => {
            let cfg = load_config(&args.common)?;

            let form = read_form(&args.form, &cfg)?;

            let resolved = form::submit(&form, args.common.strategy())?;

            let output = if args.json {
                serde_json::to_string_pretty(&resolved)?
            } else {
                resolved.template
            };

            match args.out_path {
                Some(path) => {
                    fs::write(&path, output)
                        .with_context(|| format!("write {:?}", path))?;
                    info!("Результат сохранён в {:?}", path);
                }
                None => println!("{}", output),
            }
        }
        Cli::Preview(args) => {
            let cfg = load_config(&args.common)?;

            let form = read_form(&args.form, &cfg)?;

            let resolved = form::submit(&form, args.common.strategy())?;

            let renderer = Renderer::new(cfg.branding.clone())?;

            let settings = export_settings(&cfg, args.pdf);
            let out_dir = args.out_dir.unwrap_or(cfg.output_dir);
            let path = export::export(&resolved, &renderer, &settings, &out_dir)?;

            println!("Certificate saved to {}", path.display());
        }
        Cli::Fill(args) => {
            let cfg = load_config(&args.common)?;

            let renderer = Renderer::new(cfg.branding.clone())?;

            let mut session = Session::new(args.common.strategy());

            let mut defaults = Form::default();

            loop {
                let form = cli::ask(&defaults, &cfg)?;

                match session.submit(&form) {
                    Ok(certificate) => {
                        println!("\n{}\n{}\n", certificate.recipient_name, certificate.template);
                    }
                    Err(errors) => {
                        for e in errors.errors() {
                            warn!("{}", e);
                        }
                    }
                }

                defaults = form;

                if session.current().is_some() && cli::confirm_download()? {
                    break;
                }
            }

            let certificate = session
                .current()
                .ok_or(anyhow!("there is no certificate to download"))?;

            let settings = export_settings(&cfg, args.pdf);
            let out_dir = args.out_dir.unwrap_or(cfg.output_dir.clone());
            let path = export::export(certificate, &renderer, &settings, &out_dir)?;

            println!("Certificate saved to {}", path.display());
        }
    };

    Ok(())
}

fn load_config(args: &CommonArgs) -> anyhow::Result<Config> {
    debug!("Подгружаем конфиг из {:?}", args.config_path);

    let cfg = config::load(args.config_path.clone())
        .with_context(|| format!("load config {:?}", args.config_path))?;

    Ok(cfg)
}

/// Флаг `--pdf` переопределяет формат из конфига.
fn export_settings(cfg: &Config, pdf: bool) -> export::ExportSettings {
    let mut settings = cfg.export.clone();
    if pdf {
        settings.output = OutputFormat::Pdf;
    }
    settings
}

/// Собирает форму из файла и аргументов командной строки.
/// Аргументы имеют приоритет над значениями из файла.
fn read_form(args: &FormArgs, cfg: &Config) -> anyhow::Result<Form> {
    let base = match &args.form {
        Some(path) => {
            debug!("Подгружаем форму из {:?}", path);
            form::load(path).with_context(|| format!("load form {:?}", path))?
        }
        None => Form::default(),
    };

    let template = match (&args.template, &args.template_path, &args.template_name) {
        (Some(t), _, _) => t.clone(),
        (_, Some(path), _) => fs::read_to_string(path)
            .with_context(|| format!("read template {:?}", path))?,
        (_, _, Some(name)) => cfg
            .template(name)
            .ok_or(anyhow!("template {} not found", name))?
            .to_owned(),
        _ => String::new(),
    };

    let overrides = Form {
        recipient_name: args.recipient_name.clone().unwrap_or_default(),
        certificate_id: args.certificate_id.clone().unwrap_or_default(),
        date: args.date.clone().unwrap_or_default(),
        template,
    };

    Ok(base.merge(overrides))
}
