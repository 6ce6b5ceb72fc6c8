// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use sjsync::Cli;

fn main() {
    let cli = Cli::parse();
    sjsync::logging::init(cli.verbose);
    if let Err(e) = sjsync::run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
