use anyhow::Context;
use clap::Parser;
use codex::application::{export, init::init, CarpentryService, ConfigService, DashboardService};
use codex::cli::{format_calc, format_config_list, format_stats, Cli, Commands};
use codex::domain::carpentry::DEFAULT_WASTE_PERCENT;
use codex::error::CodexError;
use codex::infrastructure::{CodexHome, JsonStore, Module, Settings};
use codex::logging::{init_logging, Verbosity};
use std::fs;
use std::net::{IpAddr, SocketAddr};

fn main() {
    let cli = Cli::parse();
    init_logging(Verbosity::from_flags(cli.verbose, cli.quiet));

    match run(cli) {
        Ok(_) => std::process::exit(0),
        Err(e) => match e.downcast_ref::<CodexError>() {
            Some(codex_err) => {
                eprintln!("Error: {}", codex_err.display_with_suggestions());
                std::process::exit(codex_err.exit_code());
            }
            None => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        },
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let home = CodexHome::discover(cli.home)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let settings = Settings::load_or_create(&home)?;
            let host = host.unwrap_or_else(|| settings.server.host.clone());
            let ip: IpAddr = host
                .trim()
                .parse()
                .with_context(|| format!("invalid host address: {}", host))?;
            let addr = SocketAddr::new(ip, port.unwrap_or(settings.server.port));
            codex::web::run(home, settings, addr)
        }
        Commands::Init { path } => {
            let home = path.map(CodexHome::new).unwrap_or(home);
            init(&home)?;
            println!("Initialized codex at {}", home.root().display());
            println!("Start the web UI with: codex serve");
            Ok(())
        }
        Commands::Config { key, value, list } => {
            home.require_initialized()?;
            let service = ConfigService::new(home);

            if list {
                print!("{}", format_config_list(&service.list()?));
            } else if let Some(k) = key {
                if let Some(v) = value {
                    service.set(&k, &v)?;
                    println!("Set {} = {}", k, v);
                } else {
                    println!("{}", service.get(&k)?);
                }
            } else {
                println!("Usage: codex config [--list | <key> [<value>]]");
                println!("Example keys: user.name, user.currency, server.port, modules.finance.enabled");
            }
            Ok(())
        }
        Commands::Stats => {
            home.require_initialized()?;
            let stats = DashboardService::new(JsonStore::in_home(&home)).stats()?;
            print!("{}", format_stats(&stats));
            Ok(())
        }
        Commands::Calc {
            lumber,
            quantity,
            waste,
            save,
        } => {
            if save {
                home.require_initialized()?;
            }
            let (default_waste, currency) = if home.is_initialized() {
                let settings = Settings::load_from(&home)?;
                settings.require_enabled(Module::Carpentry)?;
                (
                    settings.modules.carpentry.default_waste_percent(),
                    settings.user.currency,
                )
            } else {
                let defaults = Settings::default();
                (DEFAULT_WASTE_PERCENT, defaults.user.currency)
            };

            let service = CarpentryService::new(JsonStore::in_home(&home));
            let calc = service.calculate(&lumber, quantity, waste.unwrap_or(default_waste))?;
            print!("{}", format_calc(&calc, &currency));

            if save {
                let saved = service.save_calculation(&calc)?;
                println!("Saved calculation {}", saved.id);
            }
            Ok(())
        }
        Commands::Export { output } => {
            home.require_initialized()?;
            let export = export::export_data(&JsonStore::in_home(&home))?;
            match output {
                Some(path) => {
                    fs::write(&path, &export.contents).map_err(CodexError::Io)?;
                    println!("Exported data to {}", path.display());
                }
                None => println!("{}", export.contents),
            }
            Ok(())
        }
    }
}
