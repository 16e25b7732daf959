//! candwin-bridge - drive an out-of-process candidate window from a line script.

use candwin::Application;

fn main() {
    std::process::exit(Application::new().run());
}
