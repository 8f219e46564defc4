use std::thread;
use std::time::Duration;

use crate::core::dispatch::{Handler, HandlerRegistry};

/// Register the demo device-management handlers the default binary wires to
/// its command table.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register_free(
        "device_info",
        Handler::NoArgs(Box::new(|_ctx, _table| {
            println!("Device: WRX-200 rev C");
            println!("Firmware: 4.12.7 (build 2214)");
            println!("Uptime: 14 days, 03:22:41");
            Ok(())
        })),
    );

    registry.register_free(
        "device_cfg_save",
        Handler::Args(Box::new(|_ctx, _table, args, _argc| {
            if args.iter().any(|a| a == "-f") {
                println!("Forcing configuration download...");
            }
            println!("Remote device configuration saved to device.cfg");
            Ok(())
        })),
    );

    registry.register_free(
        "show_net_info",
        Handler::NoArgs(Box::new(|_ctx, _table| {
            println!("IP Address:  192.168.209.1");
            println!("Netmask:     255.255.255.0");
            println!("Gateway:     192.168.209.254");
            Ok(())
        })),
    );

    registry.register_free(
        "status",
        Handler::NoArgs(Box::new(|_ctx, _table| {
            println!("Signal: -61 dBm / Noise: -95 dBm");
            println!("TX Power: 18 dBm, Link: 54 Mbit");
            Ok(())
        })),
    );

    registry.register_free(
        "find_tower",
        Handler::NoArgs(Box::new(|ctx, _table| {
            println!("Scanning for towers (Ctrl-C to cancel)...");
            ctx.signals.begin_busy();
            for channel in 1..=11 {
                if ctx.signals.cancelled() {
                    return Ok(());
                }
                println!("channel {channel}: no beacon");
                thread::sleep(Duration::from_millis(100));
            }
            ctx.signals.end_busy();
            println!("Scan complete, no towers found.");
            Ok(())
        })),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::dispatch::Resolution;

    #[test]
    fn test_demo_handlers_are_registered() {
        let mut registry = HandlerRegistry::new();
        register(&mut registry);
        for name in [
            "device_info",
            "device_cfg_save",
            "show_net_info",
            "status",
            "find_tower",
        ] {
            assert!(
                matches!(registry.resolve_mut(name), Resolution::Free(_)),
                "missing demo handler: {name}"
            );
        }
    }
}
