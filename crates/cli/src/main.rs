fn main() {
    std::process::exit(modlift_cli::run());
}
