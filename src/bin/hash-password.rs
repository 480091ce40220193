//! Prints an argon2 PHC hash for seeding `admins.password_hash`.
//!
//! Usage: `hash-password <password>` or pipe the password on stdin.

use std::io::{self, BufRead};

fn main() {
    let password = match std::env::args().nth(1) {
        Some(arg) => arg,
        None => {
            let mut line = String::new();
            if let Err(err) = io::stdin().lock().read_line(&mut line) {
                eprintln!("failed to read password from stdin: {err}");
                std::process::exit(1);
            }
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        eprintln!("usage: hash-password <password>");
        std::process::exit(2);
    }

    match society_portal::auth::hash_password(&password) {
        Ok(hash) => println!("{hash}"),
        Err(err) => {
            eprintln!("failed to hash password: {err}");
            std::process::exit(1);
        }
    }
}
