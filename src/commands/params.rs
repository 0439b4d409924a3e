//! Vendor string parameters

use vtnvme_core::params;
use vtnvme_core::vendor::VendorSession;
use vtnvme_core::AdminChannel;

use super::CmdResult;

pub fn run_get_sn<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let sn = params::read_serial_number(&mut session)?;
    println!("SN String: {}", sn);
    Ok(())
}

pub fn run_get_mn<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let mn = params::read_model_number(&mut session)?;
    println!("MN String: {}", mn);
    Ok(())
}

pub fn run_get_fw_version<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let fw = params::read_firmware_string(&mut session)?;
    println!("F/W Version String: {}", fw);
    Ok(())
}

pub fn run_get_op<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut session = VendorSession::new(channel);
    let op = params::read_over_provisioning(&mut session)?;
    println!("Over Provisioning Percent: {}", op);
    Ok(())
}

pub fn run_set_op<C: AdminChannel + ?Sized>(channel: &mut C, value: &str) -> CmdResult {
    let mut session = VendorSession::new(channel);
    params::write_over_provisioning(&mut session, value)?;
    println!("Over Provisioning Percent set to {}", value);
    Ok(())
}

/// Write the serial and/or model number, serial first
pub fn run_set_info<C: AdminChannel + ?Sized>(
    channel: &mut C,
    serial: Option<&str>,
    model: Option<&str>,
) -> CmdResult {
    if serial.is_none() && model.is_none() {
        return Err("Nothing to set: give --serial-num and/or --model-num".into());
    }

    let mut session = VendorSession::new(channel);
    if let Some(sn) = serial {
        params::write_serial_number(&mut session, sn)?;
        println!("SN String set to {}", sn);
    }
    if let Some(mn) = model {
        params::write_model_number(&mut session, mn)?;
        println!("MN String set to {}", mn);
    }
    Ok(())
}
