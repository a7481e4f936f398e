// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON document per line"),
    )
}

fn window_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("month")
            .long("month")
            .help("Month as YYYY-MM")
            .conflicts_with_all(["from", "to"]),
    )
    .arg(
        Arg::new("from")
            .long("from")
            .requires("to")
            .help("Start date (YYYY-MM-DD, inclusive)"),
    )
    .arg(
        Arg::new("to")
            .long("to")
            .requires("from")
            .help("End date (YYYY-MM-DD, inclusive)"),
    )
}

pub fn build_cli() -> Command {
    Command::new("payday")
        .about("Payday: daily income log with monthly and annual reports")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the database"))
        .subcommand(
            Command::new("entry")
                .about("Record and browse entries")
                .subcommand(
                    Command::new("add")
                        .about("Record the amount for a day (revises an existing entry)")
                        .arg(Arg::new("date").long("date").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("owner")
                                .long("owner")
                                .help("Overrides the configured owner"),
                        ),
                )
                .subcommand(json_args(window_args(
                    Command::new("list")
                        .about("Paginated entry history, newest first")
                        .arg(
                            Arg::new("page")
                                .long("page")
                                .value_parser(value_parser!(usize))
                                .default_value("1"),
                        )
                        .arg(
                            Arg::new("page-size")
                                .long("page-size")
                                .value_parser(value_parser!(usize)),
                        ),
                )))
                .subcommand(json_args(
                    Command::new("history")
                        .about("Previous amounts of an entry")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                )),
        )
        .subcommand(
            Command::new("report")
                .about("Reports")
                .subcommand(json_args(
                    Command::new("monthly")
                        .about("Daily breakdown, comparison and projection for a month")
                        .arg(
                            Arg::new("month")
                                .long("month")
                                .help("YYYY-MM, defaults to the current month"),
                        )
                        .arg(
                            Arg::new("daily")
                                .long("daily")
                                .action(ArgAction::SetTrue)
                                .help("Include the per-day table"),
                        ),
                ))
                .subcommand(json_args(
                    Command::new("annual")
                        .about("Monthly totals, growth trend and best/worst month")
                        .arg(
                            Arg::new("year")
                                .long("year")
                                .value_parser(value_parser!(i32)),
                        ),
                ))
                .subcommand(json_args(window_args(
                    Command::new("weekdays")
                        .about("Weekdays ranked by total")
                        .arg(
                            Arg::new("top")
                                .long("top")
                                .value_parser(value_parser!(usize))
                                .default_value("3"),
                        ),
                )))
                .subcommand(json_args(
                    Command::new("ranges").about("Months that have entries, most recent first"),
                ))
                .subcommand(json_args(
                    Command::new("chart")
                        .about("Grouped totals for a period")
                        .arg(
                            Arg::new("period")
                                .long("period")
                                .default_value("current-month")
                                .help(
                                    "current-month|last-month|current-year|\
                                     last-3-months|last-6-months|year-YYYY|month-YYYY-MM",
                                ),
                        )
                        .arg(
                            Arg::new("from")
                                .long("from")
                                .requires("to")
                                .help("Custom start date; overrides --period"),
                        )
                        .arg(Arg::new("to").long("to").requires("from"))
                        .arg(
                            Arg::new("compare")
                                .long("compare")
                                .action(ArgAction::SetTrue)
                                .help("Also group the previous period of equal length"),
                        ),
                )),
        )
        .subcommand(window_args(
            Command::new("export")
                .about("Export entries")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv|json"),
                )
                .arg(Arg::new("out").long("out").required(true))
                .arg(Arg::new("min-amount").long("min-amount"))
                .arg(Arg::new("max-amount").long("max-amount"))
                .arg(Arg::new("owner").long("owner"))
                .arg(
                    Arg::new("has-notes")
                        .long("has-notes")
                        .value_parser(value_parser!(bool)),
                ),
        ))
        .subcommand(Command::new("doctor").about("List stored rows that reports skip"))
        .subcommand(
            Command::new("config")
                .about("Settings")
                .subcommand(Command::new("get").arg(Arg::new("key")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                ),
        )
}
