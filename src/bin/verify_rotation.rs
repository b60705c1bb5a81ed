// src/bin/verify_rotation.rs
//
// Verificação offline da contagem de dias trabalhados do ciclo 10/14.
// Sai com código diferente de zero quando algum defeito é encontrado.

use std::process::ExitCode;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use firehall_backend::models::rotation::RotationTeam;
use firehall_backend::scheduling::{DateRange, RotationCycle, RotationPattern, RotationVerification};

#[derive(Parser, Debug)]
#[command(author, version, about = "Verifica a contagem de dias trabalhados de uma equipe da rotação")]
struct Args {
    /// Primeiro dia do ciclo (AAAA-MM-DD)
    #[arg(long)]
    cycle_start: NaiveDate,

    /// Equipe (Vert, Bleu, Jaune, Rouge); sem ela, as quatro são verificadas
    #[arg(long)]
    team: Option<RotationTeam>,

    /// Ano civil inteiro
    #[arg(long, conflicts_with_all = ["start", "end"], required_unless_present = "start")]
    year: Option<i32>,

    #[arg(long, requires = "end")]
    start: Option<NaiveDate>,

    #[arg(long, requires = "start")]
    end: Option<NaiveDate>,

    /// Contagem esperada; uma divergência conta como defeito
    #[arg(long)]
    expected: Option<u32>,

    #[arg(long)]
    cycle_length: Option<i32>,

    /// Dias trabalhados do ciclo, separados por vírgula (ex.: 1,2,5,6,7,8,11,12)
    #[arg(long, value_delimiter = ',')]
    working_days: Vec<i32>,

    /// Imprime os relatórios em JSON
    #[arg(long)]
    json: bool,
}

impl Args {
    fn range(&self) -> anyhow::Result<DateRange> {
        let range = match (self.year, self.start, self.end) {
            (Some(year), _, _) => DateRange::year(year)?,
            (None, Some(start), Some(end)) => DateRange::new(start, end)?,
            _ => anyhow::bail!("informe --year ou --start e --end"),
        };
        Ok(range)
    }

    fn pattern(&self) -> anyhow::Result<RotationPattern> {
        let days = (!self.working_days.is_empty()).then_some(self.working_days.as_slice());
        RotationPattern::with_overrides(self.cycle_length, days).context("padrão de rotação inválido")
    }
}

fn print_report(report: &RotationVerification) {
    let status = if report.is_consistent() { "OK" } else { "DEFEITO" };
    println!(
        "{:<6} {} -> {}: {} dias trabalhados (fórmula {}, limites {}..={}) [{}]",
        report.team.name(),
        report.start,
        report.end,
        report.computed,
        report.closed_form,
        report.lower_bound,
        report.upper_bound,
        status
    );
    for defect in &report.defects {
        println!("       - {defect:?}");
    }
}

fn run(args: &Args) -> anyhow::Result<bool> {
    let range = args.range()?;
    let cycle = RotationCycle::new(args.cycle_start, args.pattern()?);

    let teams = match args.team {
        Some(team) => vec![team],
        None => RotationTeam::ALL.to_vec(),
    };
    let reports: Vec<RotationVerification> = teams
        .into_iter()
        .map(|team| cycle.verify(team, range, args.expected))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report);
        }
    }

    Ok(reports.iter().all(RotationVerification::is_consistent))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("erro: {err:#}");
            ExitCode::from(2)
        }
    }
}
