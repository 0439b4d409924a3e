//! Identify controller detail

use bitflags::Flags;
use std::fmt::{self, Write};
use vtnvme_core::admin;
use vtnvme_core::structs::{self, IdController, IDENTIFY_LEN};
use vtnvme_core::AdminChannel;

use super::CmdResult;

/// Offset of the power state descriptors in the identify data
const PSD_OFFSET: usize = 2048;
/// Size of one power state descriptor
const PSD_LEN: usize = 32;
/// Offset of the vendor specific area in the identify data
const VS_OFFSET: usize = 3072;

/// Hex digits of `bytes`, most significant byte first
fn hex_le(bytes: &[u8]) -> String {
    bytes.iter().rev().map(|b| format!("{:02X}", b)).collect()
}

/// Names of the set flags, or `none`
fn flag_names<F: Flags>(flags: F) -> String {
    let names: Vec<&str> = flags.iter_names().map(|(name, _)| name).collect();
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(" | ")
    }
}

/// Controller fields and capability bits
pub fn write_controller<W: Write>(out: &mut W, ctrl: &IdController) -> fmt::Result {
    let ver = ctrl.ver.get();
    writeln!(out, "Identify Controller")?;
    writeln!(out, "===================")?;
    writeln!(out, "VID:      0x{:04X}", ctrl.vid.get())?;
    writeln!(out, "SSVID:    0x{:04X}", ctrl.ssvid.get())?;
    writeln!(out, "SN:       {}", ctrl.serial())?;
    writeln!(out, "MN:       {}", ctrl.model())?;
    writeln!(out, "FR:       {}", ctrl.firmware_revision())?;
    writeln!(out, "RAB:      {}", ctrl.rab)?;
    writeln!(out, "IEEE:     {}", hex_le(&ctrl.ieee))?;
    writeln!(out, "CMIC:     0x{:02X} {}", ctrl.cmic, flag_names(ctrl.multipath()))?;
    writeln!(out, "MDTS:     {}", ctrl.mdts)?;
    writeln!(out, "CNTLID:   0x{:04X}", ctrl.cntlid.get())?;
    writeln!(
        out,
        "VER:      {}.{}.{}",
        ver >> 16,
        (ver >> 8) & 0xFF,
        ver & 0xFF
    )?;
    writeln!(
        out,
        "OACS:     0x{:04X} {}",
        ctrl.oacs.get(),
        flag_names(ctrl.admin_commands())
    )?;
    writeln!(out, "ACL:      {}", ctrl.acl)?;
    writeln!(out, "AERL:     {}", ctrl.aerl)?;
    writeln!(
        out,
        "FRMW:     0x{:02X} ({} slots{})",
        ctrl.frmw,
        ctrl.firmware_slots(),
        if ctrl.frmw & 0x01 != 0 { ", slot 1 read only" } else { "" }
    )?;
    writeln!(
        out,
        "LPA:      0x{:02X} {}",
        ctrl.lpa,
        flag_names(ctrl.log_page_attributes())
    )?;
    writeln!(out, "ELPE:     {}", ctrl.elpe)?;
    writeln!(out, "NPSS:     {}", ctrl.npss)?;
    writeln!(
        out,
        "WCTEMP:   {} K ({} C)",
        ctrl.wctemp.get(),
        structs::kelvin_to_celsius(ctrl.wctemp.get())
    )?;
    writeln!(
        out,
        "CCTEMP:   {} K ({} C)",
        ctrl.cctemp.get(),
        structs::kelvin_to_celsius(ctrl.cctemp.get())
    )?;
    writeln!(out, "SQES:     0x{:02X}", ctrl.sqes)?;
    writeln!(out, "CQES:     0x{:02X}", ctrl.cqes)?;
    writeln!(out, "NN:       {}", ctrl.nn.get())?;
    writeln!(
        out,
        "ONCS:     0x{:04X} {}",
        ctrl.oncs.get(),
        flag_names(ctrl.nvm_commands())
    )?;
    writeln!(out, "VWC:      0x{:02X}", ctrl.vwc)
}

/// Power state descriptor table, raw fields in hex
pub fn write_power_states<W: Write>(out: &mut W, raw: &[u8; IDENTIFY_LEN]) -> fmt::Result {
    writeln!(out, "Power State Descriptors")?;
    writeln!(
        out,
        "{:>6}{:>10}{:>5}{:>4}{:>6}{:>10}{:>10}{:>10}{:>4}{:>4}{:>4}{:>4}{:>10}{:>4}{:>6}{:>10}{:>4}{:>5}{:>6}",
        "Entry", "0fs 00-03", "NOPS", "MPS", "MP", "ENLAT", "EXLAT", "0fs 12-15", "RWL", "RWT",
        "RRL", "RRT", "0fs 16-19", "IPS", "IDLP", "0fs 20-23", "APS", "APW", "ACTP"
    )?;
    writeln!(
        out,
        "{:>6}{:>10}{:>5}{:>4}{:>6}{:>10}{:>10}{:>10}{:>4}{:>4}{:>4}{:>4}{:>10}{:>4}{:>6}{:>10}{:>4}{:>5}{:>6}",
        "=====", "=========", "====", "===", "=====", "=========", "=========", "=========",
        "===", "===", "===", "===", "=========", "===", "=====", "=========", "===", "====",
        "====="
    )?;

    for (i, psd) in raw[PSD_OFFSET..VS_OFFSET].chunks_exact(PSD_LEN).enumerate() {
        let flags = psd[3];
        let idle_scale = psd[18];
        let work_scale = psd[22];
        write!(out, "{:>6}", i)?;
        write!(out, "{:>9}h", hex_le(&psd[0..4]))?;
        write!(out, "{:>4}b{:>3}b", (flags >> 1) & 1, flags & 1)?;
        write!(out, "{:>5}h", hex_le(&psd[0..2]))?;
        write!(out, "{:>9}h{:>9}h", hex_le(&psd[4..8]), hex_le(&psd[8..12]))?;
        write!(out, "{:>9}h", hex_le(&psd[12..16]))?;
        for b in [15, 14, 13, 12] {
            write!(out, "{:>3}h", hex_le(&psd[b..b + 1]))?;
        }
        write!(out, "{:>9}h", hex_le(&psd[16..20]))?;
        write!(out, "{:>2}{}b", (idle_scale >> 6) & 1, (idle_scale >> 7) & 1)?;
        write!(out, "{:>5}h{:>9}h", hex_le(&psd[16..18]), hex_le(&psd[20..24]))?;
        write!(out, "{:>2}{}b", (work_scale >> 6) & 1, (work_scale >> 7) & 1)?;
        write!(
            out,
            "{:>2}{}{}b",
            work_scale & 1,
            (work_scale >> 1) & 1,
            (work_scale >> 2) & 1
        )?;
        writeln!(out, "{:>5}h", hex_le(&psd[20..22]))?;
    }
    Ok(())
}

/// Classic 32 bytes per line hex dump with an ASCII column
pub fn write_hex_dump<W: Write>(out: &mut W, data: &[u8]) -> fmt::Result {
    for (line_no, line) in data.chunks(32).enumerate() {
        write!(out, "[{:08X}] ", line_no * 32)?;
        for (i, b) in line.iter().enumerate() {
            write!(out, "{:02X} ", b)?;
            if (i + 1) % 8 == 0 {
                out.write_char(' ')?;
            }
        }
        for i in line.len()..32 {
            out.write_str("   ")?;
            if (i + 1) % 8 == 0 {
                out.write_char(' ')?;
            }
        }
        let text: String = line
            .iter()
            .map(|&b| if (b' '..=b'~').contains(&b) { b as char } else { '.' })
            .collect();
        writeln!(out, " {}", text)?;
    }
    Ok(())
}

pub fn run_show_identify<C: AdminChannel + ?Sized>(channel: &mut C) -> CmdResult {
    let mut raw = [0u8; IDENTIFY_LEN];
    if let Err(e) = admin::identify_controller(channel, &mut raw) {
        println!("Cannot read identify device");
        return Err(e.into());
    }
    let ctrl = structs::view::<IdController>(&raw).map_err(vtnvme_core::Error::from)?;

    let mut text = String::new();
    write_controller(&mut text, ctrl)?;
    writeln!(text)?;
    write_power_states(&mut text, &raw)?;
    writeln!(text)?;
    writeln!(text, "Vendor Specific")?;
    write_hex_dump(&mut text, &raw[VS_OFFSET..])?;
    print!("{}", text);
    Ok(())
}
