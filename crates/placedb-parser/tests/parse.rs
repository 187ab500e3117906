use placedb_core::{node::NodeKind, orient::Orient};
use placedb_parser::{
    ErrorCode,
    bookshelf::{PlStatus, parse_aux, parse_nets, parse_nodes, parse_pl, parse_scl, parse_wts},
};

const AUX: &str = "RowBasedPlacement : adder.nodes adder.nets adder.wts adder.pl adder.scl\n";

const NODES: &str = "\
UCLA nodes 1.0
# adder

NumNodes : 3
NumTerminals : 1
  a0   4  10
  a1   6  10
  in0  1  1  terminal
";

const NETS: &str = "\
UCLA nets 1.0
NumNets : 1
NumPins : 3
NetDegree : 3 sum
  in0 I : 0 0
  a0  O : -1 2
  a1  I : 1 -2
";

const WTS: &str = "UCLA wts 1.0\nsum 3\n";

const PL: &str = "\
UCLA pl 1.0
a0   0 0 : N
a1   4 10 : FS
in0  -5 5 : N /FIXED
";

const SCL: &str = "\
UCLA scl 1.0
NumRows : 1
CoreRow Horizontal
  Coordinate : 0
  Height : 10
  Sitewidth : 1
  Sitespacing : 1
  Siteorient : 1
  Sitesymmetry : 1
  SubrowOrigin : 0 NumSites : 40
End
";

#[test]
fn test_parse_design() {
    let aux = parse_aux(AUX).expect("Failed to parse aux");
    assert_eq!(*aux.wts.expect("wts listed").inner(), "adder.wts");

    let nodes = parse_nodes(NODES).expect("Failed to parse nodes");
    assert_eq!(nodes.nodes.len(), 3);
    assert_eq!(nodes.nodes[2].kind, NodeKind::Terminal);

    let nets = parse_nets(NETS).expect("Failed to parse nets");
    assert_eq!(nets.num_pins(), 3);
    assert_eq!(nets.nets[0].pins[2].offset, (1.0, -2.0));

    let wts = parse_wts(WTS).expect("Failed to parse wts");
    assert_eq!(wts.weights[0].weight, 3.0);

    let pl = parse_pl(PL).expect("Failed to parse pl");
    assert_eq!(pl.records[1].orient, Some(Orient::FS));
    assert_eq!(pl.records[2].x, -5.0);
    assert_eq!(pl.records[2].status, Some(PlStatus::Fixed));

    let scl = parse_scl(SCL).expect("Failed to parse scl");
    assert_eq!(scl.rows[0].site_orient, Orient::S);
    assert_eq!(scl.rows[0].end_x(), 40.0);
}

#[test]
fn test_diagnostics_render_with_codes() {
    let err = parse_nodes("UCLA nodes 1.0\nNumNodes : 2\na 1 1\n").unwrap_err();

    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E201));
    assert_eq!(err.to_string(), "error[E201]: 2 nodes declared but 1 found");
}

#[test]
fn test_crlf_line_endings() {
    let source = NODES.replace('\n', "\r\n");

    let nodes = parse_nodes(&source).expect("Failed to parse nodes");
    assert_eq!(nodes.nodes.len(), 3);
}

#[test]
fn test_wrong_file_kind() {
    let err = parse_pl(NODES).unwrap_err();

    assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E200));
}
