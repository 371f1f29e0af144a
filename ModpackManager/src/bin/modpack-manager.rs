fn main() -> anyhow::Result<()> {
    modpack_manager::cli::run_cli()
}
