//! `voltage_divider` command.
//!
//! Looks a device up by name, takes one sample and prints the result. The
//! caller splits the command line and owns the output.

use core::fmt::Write;

use crate::divider::Sampler;
use crate::errno::{EINVAL, ENODEV};

pub const COMMAND: &str = "voltage_divider";
pub const GET_HELP: &str = "Take a voltage divider sample. Syntax:\n<device_name>";

/// Finds the device called `name`.
pub fn find<'a, 'd>(
    devices: &'a mut [&'d mut dyn Sampler],
    name: &str,
) -> Option<&'a mut (dyn Sampler + 'd)> {
    devices
        .iter_mut()
        .find(|device| device.name() == name)
        .map(|device| &mut **device)
}

/// Runs the subcommand in `args`, e.g. `["get", "VBAT"]`.
///
/// Returns the negative error number of a failed command.
pub fn execute(
    args: &[&str],
    devices: &mut [&mut dyn Sampler],
    out: &mut impl Write,
) -> Result<(), i32> {
    match args {
        ["get", name] => get(name, devices, out),
        ["get", ..] => {
            let _ = writeln!(out, "{GET_HELP}");
            Err(-EINVAL)
        }
        _ => {
            let _ = writeln!(out, "Voltage divider commands");
            let _ = writeln!(out, "  get  {}", GET_HELP.lines().next().unwrap_or_default());
            Err(-EINVAL)
        }
    }
}

fn get(name: &str, devices: &mut [&mut dyn Sampler], out: &mut impl Write) -> Result<(), i32> {
    let Some(device) = find(devices, name) else {
        let _ = writeln!(out, "Device unknown ({name})");
        return Err(-ENODEV);
    };

    let result = device.sample_code();
    if result < 0 {
        let _ = writeln!(out, "voltage_divider_sample, err: {result}");
        return Err(result);
    }

    let _ = writeln!(out, "{} voltage: {result}", device.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::string::String;

    use super::*;
    use crate::errno::EIO;

    struct Fixed {
        name: &'static str,
        result: i32,
        calls: usize,
    }

    impl Sampler for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn sample_code(&mut self) -> i32 {
            self.calls += 1;
            self.result
        }
    }

    fn fixed(name: &'static str, result: i32) -> Fixed {
        Fixed {
            name,
            result,
            calls: 0,
        }
    }

    #[test]
    fn get_prints_voltage() {
        let mut vbat = fixed("VBAT", 3712);
        let mut vdd = fixed("VDD", 3000);
        let mut out = String::new();
        let result = execute(&["get", "VBAT"], &mut [&mut vdd, &mut vbat], &mut out);
        assert_eq!(result, Ok(()));
        assert_eq!(out, "VBAT voltage: 3712\n");
        assert_eq!((vbat.calls, vdd.calls), (1, 0));
    }

    #[test]
    fn unknown_device() {
        let mut vbat = fixed("VBAT", 3712);
        let mut out = String::new();
        let result = execute(&["get", "VBUS"], &mut [&mut vbat], &mut out);
        assert_eq!(result, Err(-ENODEV));
        assert_eq!(out, "Device unknown (VBUS)\n");
        assert_eq!(vbat.calls, 0);
    }

    #[test]
    fn sample_error_is_printed_verbatim() {
        let mut vbat = fixed("VBAT", -EIO);
        let mut out = String::new();
        let result = execute(&["get", "VBAT"], &mut [&mut vbat], &mut out);
        assert_eq!(result, Err(-EIO));
        assert_eq!(out, "voltage_divider_sample, err: -5\n");
    }

    #[test]
    fn malformed_arguments() {
        let mut out = String::new();
        assert_eq!(execute(&["get"], &mut [], &mut out), Err(-EINVAL));
        assert!(out.starts_with("Take a voltage divider sample"));

        out.clear();
        assert_eq!(execute(&["set", "VBAT"], &mut [], &mut out), Err(-EINVAL));
        assert!(out.contains("get"));
    }
}
