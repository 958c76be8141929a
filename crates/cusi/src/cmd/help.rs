const COMMANDS: &[(&str, &str)] = &[
    ("ls [PATH]", "list files in a device directory"),
    ("put LOCAL REMOTE", "upload a local file to the device"),
    ("get REMOTE [LOCAL]", "print a device file, or save it to LOCAL"),
    ("rm PATH", "remove a file from the device"),
    ("help", "show this help"),
    ("exit", "leave the shell"),
];

pub fn run() {
    println!("Commands:");
    for (usage, about) in COMMANDS {
        println!("  {usage:<20} {about}");
    }
    println!();
    println!("Remote paths are relative to /flash.");
}
