//! Shell link (.lnk) encoder.
//!
//! Produces the subset of the MS-SHLLINK layout needed for a file target:
//!
//! | Part | Content |
//! |---|---|
//! | `ShellLinkHeader` (76 bytes) | size, CLSID, `LinkFlags` at offset 20, attributes, zeroed times, `ShowCommand` at offset 60 |
//! | `LinkInfo` | `VolumeID` (fixed drive, empty label) and the target as `LocalBasePath`, ANSI and Unicode |
//! | `StringData` | working directory and arguments, Unicode, each prefixed by a `u16` character count |
//! | terminal block | four zero bytes |
//!
//! No timestamps or host state are embedded, so the same spec always encodes
//! to the same bytes.

use std::io;

use super::ShortcutSpec;

const HEADER_SIZE: u32 = 0x4C;
/// `{00021401-0000-0000-C000-000000000046}` in on-disk order.
const LINK_CLSID: [u8; 16] = [
    0x01, 0x14, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x46,
];

const HAS_LINK_INFO: u32 = 0x0000_0002;
const HAS_WORKING_DIR: u32 = 0x0000_0010;
const HAS_ARGUMENTS: u32 = 0x0000_0020;
const IS_UNICODE: u32 = 0x0000_0080;

const FILE_ATTRIBUTE_ARCHIVE: u32 = 0x0000_0020;

/// Header size including the two Unicode offset fields.
const LINK_INFO_HEADER_SIZE: u32 = 0x24;
const VOLUME_ID_AND_LOCAL_BASE_PATH: u32 = 0x1;
const DRIVE_FIXED: u32 = 3;
/// 16-byte `VolumeID` header plus the empty label's NUL.
const VOLUME_ID_SIZE: u32 = 0x11;
const VOLUME_LABEL_OFFSET: u32 = 0x10;

/// Encode `spec` as shell-link bytes.
///
/// Fails with `InvalidInput` when a string is too long for the format.
pub fn encode_link(spec: &ShortcutSpec) -> io::Result<Vec<u8>> {
    let mut flags = HAS_LINK_INFO | IS_UNICODE;
    if !spec.working_directory().is_empty() {
        flags |= HAS_WORKING_DIR;
    }
    if !spec.arguments().is_empty() {
        flags |= HAS_ARGUMENTS;
    }

    let mut out = Vec::with_capacity(256);
    write_header(&mut out, flags, spec.window_mode().show_command());
    write_link_info(&mut out, spec.target_path())?;
    if flags & HAS_WORKING_DIR != 0 {
        write_string_data(&mut out, spec.working_directory())?;
    }
    if flags & HAS_ARGUMENTS != 0 {
        write_string_data(&mut out, spec.arguments())?;
    }
    put_u32(&mut out, 0);
    Ok(out)
}

fn write_header(out: &mut Vec<u8>, flags: u32, show_command: u32) {
    put_u32(out, HEADER_SIZE);
    out.extend_from_slice(&LINK_CLSID);
    put_u32(out, flags);
    put_u32(out, FILE_ATTRIBUTE_ARCHIVE);
    // CreationTime, AccessTime, WriteTime
    out.extend_from_slice(&[0u8; 24]);
    // FileSize, IconIndex
    put_u32(out, 0);
    put_u32(out, 0);
    put_u32(out, show_command);
    // HotKey, Reserved1..3
    put_u16(out, 0);
    put_u16(out, 0);
    put_u32(out, 0);
    put_u32(out, 0);
    debug_assert_eq!(out.len(), HEADER_SIZE as usize);
}

fn write_link_info(out: &mut Vec<u8>, target: &str) -> io::Result<()> {
    let ansi: Vec<u8> = target
        .chars()
        .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
        .chain(std::iter::once(0))
        .collect();
    let unicode: Vec<u16> = target.encode_utf16().chain(std::iter::once(0)).collect();

    let volume_id_offset = LINK_INFO_HEADER_SIZE;
    let local_base_path_offset = volume_id_offset + VOLUME_ID_SIZE;
    let common_path_suffix_offset = local_base_path_offset + len_u32(ansi.len())?;
    let local_base_path_offset_unicode = common_path_suffix_offset + 1;
    let common_path_suffix_offset_unicode =
        local_base_path_offset_unicode + len_u32(unicode.len() * 2)?;
    let link_info_size = common_path_suffix_offset_unicode + 2;

    put_u32(out, link_info_size);
    put_u32(out, LINK_INFO_HEADER_SIZE);
    put_u32(out, VOLUME_ID_AND_LOCAL_BASE_PATH);
    put_u32(out, volume_id_offset);
    put_u32(out, local_base_path_offset);
    // CommonNetworkRelativeLinkOffset
    put_u32(out, 0);
    put_u32(out, common_path_suffix_offset);
    put_u32(out, local_base_path_offset_unicode);
    put_u32(out, common_path_suffix_offset_unicode);

    put_u32(out, VOLUME_ID_SIZE);
    put_u32(out, DRIVE_FIXED);
    // DriveSerialNumber
    put_u32(out, 0);
    put_u32(out, VOLUME_LABEL_OFFSET);
    out.push(0);

    out.extend_from_slice(&ansi);
    // CommonPathSuffix (empty)
    out.push(0);
    for unit in unicode {
        put_u16(out, unit);
    }
    put_u16(out, 0);
    Ok(())
}

fn write_string_data(out: &mut Vec<u8>, value: &str) -> io::Result<()> {
    let units: Vec<u16> = value.encode_utf16().collect();
    let count = u16::try_from(units.len()).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("string of {} characters is too long for a shell link", units.len()),
        )
    })?;
    put_u16(out, count);
    for unit in units {
        put_u16(out, unit);
    }
    Ok(())
}

fn len_u32(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, "target path is too long")
    })
}

fn put_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_le_bytes());
}

fn put_u32(out: &mut Vec<u8>, value: u32) {
    out.extend_from_slice(&value.to_le_bytes());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::LocationChoice;
    use crate::shortcut::WindowMode;

    fn read_u32(bytes: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
    }

    fn read_u16(bytes: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(bytes[offset..offset + 2].try_into().unwrap())
    }

    fn utf16_at(bytes: &[u8], offset: usize, units: usize) -> String {
        let raw: Vec<u16> = (0..units).map(|i| read_u16(bytes, offset + i * 2)).collect();
        String::from_utf16(&raw).unwrap()
    }

    fn spec() -> ShortcutSpec {
        ShortcutSpec::new("Notepad", r"C:\Windows\notepad.exe", LocationChoice::DesktopUser)
    }

    #[test]
    fn test_header_layout() {
        let bytes = encode_link(&spec().with_window_mode(WindowMode::Minimized)).unwrap();

        assert_eq!(read_u32(&bytes, 0), HEADER_SIZE);
        assert_eq!(&bytes[4..20], &LINK_CLSID);
        assert_eq!(read_u32(&bytes, 20), HAS_LINK_INFO | IS_UNICODE);
        assert_eq!(read_u32(&bytes, 60), 7);
        // The run-as bit is never set by the encoder itself.
        assert_eq!(read_u32(&bytes, 20) & 0x2000, 0);
    }

    #[test]
    fn test_link_info_points_at_target() {
        let target = r"C:\Program Files\Tool\tool.exe";
        let bytes = encode_link(&ShortcutSpec::new("Tool", target, LocationChoice::DesktopUser))
            .unwrap();

        let info = HEADER_SIZE as usize;
        let size = read_u32(&bytes, info) as usize;
        let local = read_u32(&bytes, info + 16) as usize;
        let local_unicode = read_u32(&bytes, info + 28) as usize;

        assert_eq!(&bytes[info + local..info + local + target.len()], target.as_bytes());
        assert_eq!(
            utf16_at(&bytes, info + local_unicode, target.encode_utf16().count()),
            target
        );
        // Terminal block follows LinkInfo directly when no strings are present.
        assert_eq!(bytes.len(), info + size + 4);
    }

    #[test]
    fn test_string_data_holds_working_dir_then_arguments() {
        let spec = spec()
            .with_working_directory(r"C:\Windows")
            .with_arguments("/A file.txt");
        let bytes = encode_link(&spec).unwrap();

        let flags = read_u32(&bytes, 20);
        assert_ne!(flags & HAS_WORKING_DIR, 0);
        assert_ne!(flags & HAS_ARGUMENTS, 0);

        let info = HEADER_SIZE as usize;
        let mut offset = info + read_u32(&bytes, info) as usize;

        let count = read_u16(&bytes, offset) as usize;
        assert_eq!(utf16_at(&bytes, offset + 2, count), r"C:\Windows");
        offset += 2 + count * 2;

        let count = read_u16(&bytes, offset) as usize;
        assert_eq!(utf16_at(&bytes, offset + 2, count), "/A file.txt");
    }

    #[test]
    fn test_non_ascii_target_is_preserved_in_unicode_path() {
        let target = "C:\\Users\\Zoë\\app.exe";
        let bytes = encode_link(&ShortcutSpec::new("app", target, LocationChoice::DesktopUser))
            .unwrap();

        let info = HEADER_SIZE as usize;
        let local_unicode = read_u32(&bytes, info + 28) as usize;
        assert_eq!(
            utf16_at(&bytes, info + local_unicode, target.encode_utf16().count()),
            target
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let spec = spec().with_arguments("-x");
        assert_eq!(encode_link(&spec).unwrap(), encode_link(&spec).unwrap());
    }

    #[test]
    fn test_oversized_argument_is_rejected() {
        let spec = spec().with_arguments("a".repeat(70_000));
        let err = encode_link(&spec).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
