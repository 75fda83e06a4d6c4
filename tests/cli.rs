use assert_cmd::Command;
use std::io::Write;
use std::str;

/// Run geofeedcheck with the feed supplied on stdin, returning stdout and
/// whether the process exited successfully.
fn run_geofeedcheck(input: &str, args: &[&str]) -> (String, bool) {
    let mut test_args = vec!["-"];
    test_args.extend_from_slice(args);

    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd
        .args(&test_args)
        .write_stdin(input)
        .output()
        .expect("failed to execute");

    let stdout = str::from_utf8(&output.stdout)
        .expect("Failed to read stdout as UTF-8")
        .to_string();

    (stdout, output.status.success())
}

/// A well-formed feed passes with exit code 0
#[test]
fn valid_feed_passes() {
    let input = "# example.net geofeed\n192.0.2.0/24,US,US-NY,New York\n2001:db8::/32,SE\n";
    let (stdout, success) = run_geofeedcheck(input, &[]);

    assert!(success, "expected exit 0, got output:\n{}", stdout);
    assert!(stdout.contains("Total lines: 3"));
    assert!(stdout.contains("Comment lines: 1"));
    assert!(stdout.contains("Data lines: 2"));
    assert!(stdout.contains("Valid lines: 2"));
    assert!(stdout.contains("Invalid lines: 0"));
    assert!(stdout.contains("Validation PASSED - All 2 data lines are valid"));
}

/// Empty input is trivially valid
#[test]
fn empty_feed_passes() {
    let (stdout, success) = run_geofeedcheck("", &[]);

    assert!(success);
    assert!(stdout.contains("Total lines: 0"));
    assert!(stdout.contains("Validation PASSED"));
}

/// A network address with host bits set fails validation
#[test]
fn non_canonical_network_fails() {
    let input = "192.0.2.1/24,US\n";
    let (stdout, success) = run_geofeedcheck(input, &[]);

    assert!(!success);
    assert!(stdout.contains("invalid network address: 192.0.2.1/24"));
    assert!(stdout.contains("Validation FAILED with 1 errors"));
}

/// Too few fields is an error naming the field count
#[test]
fn short_line_fails() {
    let input = "192.0.2.0/24\n";
    let (stdout, success) = run_geofeedcheck(input, &[]);

    assert!(!success);
    assert!(stdout.contains("Expected at least 2 fields (IP range, country code), got 1"));
    assert!(stdout.contains("Full line: 192.0.2.0/24"));
}

/// Unknown country codes warn but do not fail the run
#[test]
fn unknown_country_warns_only() {
    let input = "192.0.2.0/24,ZZ\n";
    let (stdout, success) = run_geofeedcheck(input, &[]);

    assert!(success);
    assert!(stdout.contains("WARNING: Line 1: Unknown country code: ZZ"));
    assert!(stdout.contains("Validation PASSED"));
}

/// Region format mismatches are errors
#[test]
fn bad_region_fails() {
    let input = "192.0.2.0/24,US,USNY\n";
    let (stdout, success) = run_geofeedcheck(input, &[]);

    assert!(!success);
    assert!(stdout.contains("Invalid region code format: USNY"));
}

/// Overlapping ranges produce a single warning naming both lines
#[test]
fn overlap_detection() {
    let input = "192.0.2.0/24,US\n192.0.2.128/25,US\n";
    let (stdout, success) = run_geofeedcheck(input, &[]);

    assert!(success, "overlaps are warnings, not errors");
    assert!(stdout.contains("Overlapping IPv4 ranges found at lines 1 and 2"));
    assert!(stdout.contains("192.0.2.0/24 overlaps 192.0.2.128/25"));
}

/// --no-overlap-check suppresses the scan entirely
#[test]
fn overlap_check_disabled() {
    let input = "192.0.2.0/24,US\n192.0.2.128/25,US\n";
    let (stdout, success) = run_geofeedcheck(input, &["--no-overlap-check"]);

    assert!(success);
    assert!(!stdout.contains("Overlapping"));
}

/// --stats prints exact address totals
#[test]
fn stats_totals() {
    let input = "10.0.0.0/24,US\n10.1.0.0/24,US\n10.0.0.1/32,US\n";
    let (stdout, success) = run_geofeedcheck(input, &["--stats"]);

    assert!(success);
    assert!(stdout.contains("Total IP prefixes processed: 3"));
    assert!(stdout.contains("Total IP addresses: 513"));
    assert!(stdout.contains("Distinct countries: 1"));
    assert!(stdout.contains("US: 3 prefixes"));
    assert!(stdout.contains("/24: 2 entries (256 addresses each, 512 total)"));
}

/// IPv6 address totals switch to scientific notation
#[test]
fn stats_ipv6_scientific() {
    let input = "2001:db8::/32,SE\n";
    let (stdout, success) = run_geofeedcheck(input, &["--stats"]);

    assert!(success);
    // 2^96 addresses
    assert!(stdout.contains("Total IP addresses: 7.92e+28"));
    assert!(stdout.contains("IPv6 Prefix length breakdown:"));
}

/// -4 skips IPv6 entries with a warning and excludes them from stats
#[test]
fn ipv4_only_filter() {
    let input = "192.0.2.0/24,US\n2001:db8::/32,SE\n";
    let (stdout, success) = run_geofeedcheck(input, &["-4", "--stats"]);

    assert!(success);
    assert!(stdout.contains("Skipping IPv6 address (IPv4 only mode): 2001:db8::/32"));
    assert!(stdout.contains("Valid lines: 1"));
    assert!(stdout.contains("Invalid lines: 1"));
    assert!(stdout.contains("Total IP prefixes processed: 1"));
    assert!(!stdout.contains("IPv6 Prefix length breakdown:"));
}

/// -4 and -6 are mutually exclusive
#[test]
fn family_flags_conflict() {
    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd.args(["-4", "-6", "-"]).output().expect("failed to execute");
    assert!(!output.status.success());
}

/// Feeds can also be read from a file path
#[test]
fn file_input() {
    let mut feed = tempfile::NamedTempFile::new().unwrap();
    writeln!(feed, "# file-based feed").unwrap();
    writeln!(feed, "198.51.100.0/24,DE,DE-BE,Berlin").unwrap();

    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd
        .arg(feed.path())
        .arg("--verbose")
        .output()
        .expect("failed to execute");

    assert!(output.status.success());
    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert!(stdout.contains("Validation PASSED"));
    assert!(stdout.contains("is a valid RFC 8805 geo IP feed"));
}

/// A missing file is a fatal error, not a validation finding
#[test]
fn missing_file_is_fatal() {
    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd
        .arg("definitely/not/here.csv")
        .output()
        .expect("failed to execute");

    assert!(!output.status.success());
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(stderr.contains("cannot read feed from definitely/not/here.csv"));
}
