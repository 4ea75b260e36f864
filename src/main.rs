fn main() {
    std::process::exit(catalog_sync_lib::run());
}
