//! Colorized console output.
//!
//! The terminal transcript is the only artifact a run leaves behind, so every
//! step reports through one of these helpers. Writes are best effort.

use colored::{Color, Colorize};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;
const BOX_WIDTH: usize = 40;

pub struct Console<W: Write> {
    out: W,
}

impl Console<io::Stdout> {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> Console<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn success(&mut self, msg: &str) {
        self.line(&format!("✅ {msg}").green().to_string());
    }

    pub fn error(&mut self, msg: &str) {
        self.line(&format!("❌ {msg}").red().to_string());
    }

    pub fn info(&mut self, msg: &str) {
        self.line(&format!("ℹ️  {msg}").blue().to_string());
    }

    pub fn warning(&mut self, msg: &str) {
        self.line(&format!("⚠️  {msg}").yellow().to_string());
    }

    /// Section header: a bold blue title between two rules.
    pub fn header(&mut self, msg: &str) {
        let rule = "=".repeat(RULE_WIDTH);
        self.line("");
        self.line(&rule.blue().bold().to_string());
        self.line(&msg.blue().bold().to_string());
        self.line(&rule.blue().bold().to_string());
        self.line("");
    }

    pub fn rule(&mut self, color: Color) {
        self.line(&"=".repeat(RULE_WIDTH).color(color).bold().to_string());
    }

    /// Boxed title used for the opening banner and the closing summary.
    pub fn banner(&mut self, title: &str, color: Color) {
        let bar = "═".repeat(BOX_WIDTH);
        let pad = BOX_WIDTH.saturating_sub(display_width(title) + 3);
        self.line("");
        self.line(&format!("╔{bar}╗").color(color).bold().to_string());
        self.line(
            &format!("║   {title}{}║", " ".repeat(pad))
                .color(color)
                .bold()
                .to_string(),
        );
        self.line(&format!("╚{bar}╝").color(color).bold().to_string());
        self.line("");
    }

    pub fn plain(&mut self, msg: &str) {
        self.line(msg);
    }

    pub fn colored(&mut self, msg: &str, color: Color) {
        self.line(&msg.color(color).to_string());
    }

    /// Print a prompt without a trailing newline so input lands on the same line.
    pub fn prompt(&mut self, label: &str) {
        let _ = write!(self.out, "{}", label.yellow());
        let _ = self.out.flush();
    }

    fn line(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
    }
}

/// Terminal columns taken by `text`, counting CJK and emoji as double width.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| if (c as u32) >= 0x1100 { 2 } else { 1 })
        .sum()
}
