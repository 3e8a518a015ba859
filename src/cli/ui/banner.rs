use colored::Colorize;

use crate::cli::output::{self, current_preferences};

/// Landing view shown until a valid save exists.
pub struct Banner;

impl Banner {
    pub fn render() {
        let plain = current_preferences().plain_mode;
        output::blank_line();
        if plain {
            println!("Billguard");
        } else {
            println!("{}{}", "Bill".bold(), "guard".bold().truecolor(225, 29, 72));
        }
        println!("Stop paying for things you forgot about.");
        output::blank_line();
        for line in Self::pitch_lines() {
            println!("  {}", line);
        }
        output::blank_line();
        output::info("Free. No account needed. Saves locally.");
        output::info("Type `start` to begin tracking, or `help` to see every command.");
    }

    fn pitch_lines() -> [&'static str; 4] {
        [
            "Visual breakdown of where the money goes",
            "Renewal alerts before the next charge lands",
            "One insight that names your biggest spend",
            "Add, edit, pause, and delete in seconds",
        ]
    }
}
