/// Strips a trailing `\n` or `\r\n` from a raw line.
pub fn trim_line_ending(mut raw: &[u8]) -> &[u8] {
    if let [rest @ .., b'\n'] = raw {
        raw = rest;
    }
    if let [rest @ .., b'\r'] = raw {
        raw = rest;
    }
    raw
}
