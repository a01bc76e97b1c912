use workshop_cli::process_command::process_command;

pub fn main() {
    let code = process_command();
    std::process::exit(code);
}
