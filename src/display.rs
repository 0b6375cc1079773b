use colored::Colorize;

// Terminal output helpers. Green for confirmations, red for errors, cyan for
// neutral info, bold magenta for day headings.

pub fn ok(message: &str) {
    println!("{}", message.green());
}

pub fn info(message: &str) {
    println!("{}", message.cyan());
}

pub fn heading(message: &str) {
    println!("{}", message.magenta().bold());
}

pub fn error(message: &str) {
    eprintln!("{}", message.red());
}
