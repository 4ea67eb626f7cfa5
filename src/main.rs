// cert-checker - expiry checks for X.509 certificates, proxies and Kerberos keytabs
// Copyright (C) 2025 Marc Rivero (@seifreed)
// Licensed under GPL-3.0
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, version 3.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

use anyhow::{Context, Result};
use cert_checker::api::{MetricsMode, MetricsServer, MetricsServerConfig};
use cert_checker::cli::{Args, RunMode, version_info};
use cert_checker::credentials::CredentialReader;
use cert_checker::expiry::ExpiryExtractor;
use cert_checker::metrics::MetricsCollector;
use cert_checker::monitor::{
    AlertDispatcher, CheckSettings, Checker, CredentialConfig, MailConfig, MonitorDaemon,
    WebhookConfig, resolve_token,
};
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse_compat();

    // Handle -version (display version and exit)
    if args.run_mode() == RunMode::Version {
        println!("{}", version_info());
        return;
    }

    // Initialize logging - respect RUST_LOG, -verbose forces debug
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|s| s.parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_file(true)
        .with_line_number(true)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set subscriber: {}", e);
    }

    if let Err(e) = run(args).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let reader = CredentialReader::new().with_keytab_inspector(args.keytab_inspector());
    let extractor = ExpiryExtractor::new(args.alerting.interval);

    match args.run_mode() {
        RunMode::Version => Ok(()),
        RunMode::ConfigMetrics => {
            let configs = CredentialConfig::list_from_file(&args.server.config)?;
            info!(
                "Loaded {} credentials from {}",
                configs.len(),
                args.server.config
            );

            let mode = MetricsMode::CredentialList {
                configs,
                team: args.server.team.clone(),
            };
            serve_metrics(&args, MetricsCollector::new(reader, extractor), mode).await
        }
        RunMode::SingleMetrics => {
            let mode = MetricsMode::Single(args.credential_source()?);
            serve_metrics(&args, MetricsCollector::new(reader, extractor), mode).await
        }
        RunMode::Daemon => {
            let source = args.credential_source()?;
            let daemon = MonitorDaemon::new(
                build_checker(&args, reader)?,
                source,
                Duration::from_secs(args.alerting.daemon),
            );
            daemon.start().await?;
            Ok(())
        }
        RunMode::OneShot => {
            let source = args.credential_source()?;
            let report = build_checker(&args, reader)?
                .check(&source)
                .await
                .with_context(|| format!("Unable to check {}", source.path()))?;

            info!(
                "{} {}: {}",
                source.kind(),
                source.path(),
                serde_json::to_string(&report.verdict)?
            );
            Ok(())
        }
    }
}

fn build_checker(args: &Args, reader: CredentialReader) -> Result<Checker> {
    let token = resolve_token(&args.alerting.token)?;
    let dispatcher = AlertDispatcher::from_config(MailConfig::from_env(), WebhookConfig::new(token))?;

    Ok(Checker::new(
        reader,
        dispatcher,
        CheckSettings {
            lookahead_secs: args.alerting.interval,
            alert_target: args.alerting.alert.clone(),
        },
    ))
}

async fn serve_metrics(args: &Args, collector: MetricsCollector, mode: MetricsMode) -> Result<()> {
    let config = MetricsServerConfig {
        port: args.server.http_port,
        base_path: args.server.http_base.clone(),
        ..Default::default()
    };

    MetricsServer::new(config, collector, mode).run().await?;
    Ok(())
}
