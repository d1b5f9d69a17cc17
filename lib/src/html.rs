const HEADER: &str = "<!DOCTYPE html>\r\n<html>\r\n<head>\r\n\
<meta http-equiv=\"Content-Type\" content=\"text/html\">\r\n<meta charset=\"UTF-8\">\r\n\
</head>\r\n<body>\r\n\
<div style=\"font-family:'\u{ff2d}\u{ff33} \u{ff30}\u{30b4}\u{30b7}\u{30c3}\u{30af}';\
font-size:16px;line-height:18px;\">\r\n<nobr>\r\n";
const FOOTER: &str = "</nobr>\r\n</div>\r\n</body>\r\n</html>\r\n";

const BREAK: &str = "<br>\r\n";

/// Wrap text lines in a standalone HTML page using the font the glyph widths were
/// measured with.
///
/// Lines are joined with breaks and one more break closes the block, so a page
/// without lines still holds a single break.
pub fn to_html<S: AsRef<str>>(lines: &[S]) -> String {
    let body: Vec<String> = lines.iter().map(|line| escape(line.as_ref())).collect();
    let mut html = String::from(HEADER);
    html.push_str(&body.join(BREAK));
    html.push_str(BREAK);
    html.push_str(FOOTER);
    html
}

fn escape(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
