//! Prompts command handler.

use chatdeck_core::config::Config;
use chatdeck_core::prompts::{self, PROMPT_CARDS};

pub fn list(config: &Config) {
    println!("{}", prompts::greeting(&config.user_name));
    println!("{}", prompts::HEADLINE);
    println!();
    for (idx, card) in PROMPT_CARDS.iter().enumerate() {
        println!("{}. {} {}", idx + 1, card.glyph, card.title);
    }
}
