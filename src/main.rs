fn main() {
    if let Err(err) = weekly_links::cli::run() {
        weekly_links::ui::eprintln_error(&err);
        std::process::exit(weekly_links::exit::exit_code(&err));
    }
}
