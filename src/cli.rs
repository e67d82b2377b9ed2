// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .conflicts_with("jsonl")
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn label_arg(required: bool) -> Arg {
    Arg::new("label")
        .long("label")
        .short('l')
        .action(ArgAction::Append)
        .required(required)
        .help("Case label to include (repeatable)")
}

fn forecast_window(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("end")
            .long("end")
            .help("Forecast end date YYYY-MM-DD (default: setting end_date)"),
    )
    .arg(
        Arg::new("abandonment")
            .long("abandonment")
            .allow_negative_numbers(true)
            .help("Abandonment rate (default: setting abandonment_rate)"),
    )
}

pub fn build_cli() -> Command {
    command!()
        .name("wellcast")
        .about("Arps decline-curve forecast cases, EUR and multi-well aggregation")
        .arg(
            Arg::new("db")
                .long("db")
                .env("WELLCAST_DB")
                .global(true)
                .help("Path to the SQLite database"),
        )
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("well")
                .about("Well registry")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("field").long("field"))
                        .arg(Arg::new("zone").long("zone"))
                        .arg(Arg::new("type").long("type").help("producer, WI, ...")),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("case")
                .about("Forecast cases")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("well").long("well").required(true))
                        .arg(Arg::new("label").long("label").required(true))
                        .arg(Arg::new("eff_date").long("eff-date").required(true))
                        .arg(
                            Arg::new("qi")
                                .long("qi")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(
                            Arg::new("di")
                                .long("di")
                                .required(true)
                                .allow_negative_numbers(true)
                                .help("Nominal decline, 1/day"),
                        )
                        .arg(
                            Arg::new("b")
                                .long("b")
                                .required(true)
                                .allow_negative_numbers(true),
                        ),
                )
                .subcommand(
                    Command::new("import")
                        .about("Batch entry from CSV: well_name,case_label,eff_date,qi,di,b")
                        .arg(Arg::new("path").long("path").required(true)),
                )
                .subcommand(json_flags(Command::new("list").arg(label_arg(false))))
                .subcommand(Command::new("labels")),
        )
        .subcommand(
            Command::new("forecast")
                .about("Build profiles and EUR for selected case labels")
                .subcommand(json_flags(forecast_window(
                    Command::new("eur").arg(label_arg(false)),
                )))
                .subcommand(json_flags(forecast_window(
                    Command::new("series")
                        .arg(label_arg(false))
                        .arg(
                            Arg::new("raw")
                                .long("raw")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("pivot")
                                .help("Per-well profiles instead of summed series"),
                        )
                        .arg(
                            Arg::new("pivot")
                                .long("pivot")
                                .action(ArgAction::SetTrue)
                                .help("Date x label table of summed rates"),
                        )
                        .arg(
                            Arg::new("cumulative")
                                .long("cumulative")
                                .action(ArgAction::SetTrue)
                                .requires("pivot")
                                .help("Pivot cumulative volume instead of rate"),
                        )
                        .arg(
                            Arg::new("annotations")
                                .long("annotations")
                                .action(ArgAction::SetTrue)
                                .conflicts_with_all(["raw", "pivot"])
                                .help("First day of each well on its label's curve"),
                        ),
                )))
                .subcommand(json_flags(
                    Command::new("curve")
                        .about("Ad-hoc profile from explicit parameters")
                        .arg(
                            Arg::new("qi")
                                .long("qi")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(
                            Arg::new("di")
                                .long("di")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(
                            Arg::new("b")
                                .long("b")
                                .required(true)
                                .allow_negative_numbers(true),
                        )
                        .arg(Arg::new("start").long("start").required(true))
                        .arg(Arg::new("end").long("end").required(true))
                        .arg(
                            Arg::new("abandonment")
                                .long("abandonment")
                                .allow_negative_numbers(true),
                        ),
                )),
        )
        .subcommand(
            Command::new("export").subcommand(forecast_window(
                Command::new("forecast")
                    .arg(label_arg(false))
                    .arg(
                        Arg::new("format")
                            .long("format")
                            .required(true)
                            .help("csv|json"),
                    )
                    .arg(Arg::new("out").long("out").required(true))
                    .arg(
                        Arg::new("view")
                            .long("view")
                            .default_value("summed")
                            .help("summed|raw|pivot|eur"),
                    ),
            )),
        )
        .subcommand(
            Command::new("config")
                .about("Forecast defaults")
                .subcommand(Command::new("get").arg(Arg::new("key").required(true)))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(
                            Arg::new("value")
                                .required(true)
                                .allow_negative_numbers(true),
                        ),
                )
                .subcommand(Command::new("list")),
        )
        .subcommand(Command::new("doctor").about("Check stored cases for problems"))
}
