fn main() -> std::process::ExitCode {
    packdev_lib::run()
}
