use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn imlgen_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("imlgen"));
	cmd.env("NO_COLOR", "1");
	cmd
}

pub const APP_CONFIG: &str = "[[modules]]\nmodule_name = \"app\"\nmodule_path = \"app\"\nsource_folders \
                              = [\"src\"]\n\n[[cores]]\nname = \"kernel\"\n";
