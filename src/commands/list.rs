//! List command implementation

/// List the device backends compiled into this build
pub fn list_devices() {
    println!("Device backends:");
    println!();
    for info in vtnvme_device::available_devices() {
        let names = if info.aliases.is_empty() {
            info.name.to_string()
        } else {
            format!("{} ({})", info.name, info.aliases.join(", "))
        };
        println!("  {:<18} - {}", names, info.description);
    }
    println!();
    println!("A path such as /dev/nvme0 selects the linux backend.");
}
