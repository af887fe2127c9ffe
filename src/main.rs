use nimbus_shell::arena::POOL_SIZE;
use nimbus_shell::{Console, Shell, StdConsole};

fn main() {
    let mut console = StdConsole::new();
    let mut shell = Shell::new(POOL_SIZE);

    shell.banner(&mut console);
    console.write("Type 'help' for a list of commands.\n\n");
    shell.run(&mut console);
}
