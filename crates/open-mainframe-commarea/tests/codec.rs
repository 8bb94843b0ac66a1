//! End-to-end tests for the commarea codec.
//!
//! Records are declared with `copybook!` and driven through the public
//! decode, encode and dump entry points.

use open_mainframe_commarea::{
    copybook, decode, decode_into, dump, encode, encoded_size, CodecError, Copybook,
};

copybook! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Address {
        #[pic("X(10)")]
        pub city: String,
        #[pic("9(5)")]
        pub zip: u32,
    }
}

copybook! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct OrderLine {
        #[pic("X(4)")]
        pub sku: String,
        #[pic("S9(5)COMP-3")]
        pub amount: i64,
        #[pic("COMP(4)")]
        pub qty: u16,
    }
}

copybook! {
    /// Order header with a variable number of lines.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Order {
        #[pic("ORDER-ID,9(6)")]
        pub id: u32,
        #[pic("X")]
        pub status: u8,
        #[group]
        pub ship_to: Address,
        #[pic("S9(4)COMP")]
        pub line_count: i16,
        #[occurs(line_count)]
        pub lines: Vec<OrderLine>,
        #[skip]
        /// Local annotation, never sent.
        pub note: Option<String>,
    }
}

copybook! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Widths {
        #[pic("S9(4)COMP")]
        pub half: i16,
        #[pic("S9(7)COMP")]
        pub full: i32,
        #[pic("S9(12)COMP")]
        pub double: i64,
    }
}

copybook! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Label {
        #[pic("X(5)")]
        pub text: String,
    }
}

copybook! {
    #[derive(Debug, Default)]
    pub struct CountAfterArray {
        #[occurs(count)]
        pub items: Vec<Label>,
        #[pic("9(2)")]
        pub count: u8,
    }
}

copybook! {
    #[derive(Debug, Default, PartialEq)]
    pub struct Tally {
        #[pic("9(2)")]
        pub n: u16,
        #[occurs(N)]
        pub labels: Vec<Label>,
    }
}

copybook! {
    #[derive(Debug, Default)]
    pub struct Bulk {
        #[pic("9(7)")]
        pub n: u32,
        #[occurs(n)]
        pub labels: Vec<Label>,
    }
}

copybook! {
    #[derive(Debug, Default)]
    pub struct Huge {
        #[pic("S9(18)COMP")]
        pub n: i64,
        #[occurs(n)]
        pub labels: Vec<Label>,
    }
}

copybook! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Shelf {
        #[pic("X(3)")]
        pub code: String,
        #[pic("9")]
        pub count: u8,
        #[occurs(count)]
        pub items: Vec<Label>,
    }
}

copybook! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Warehouse {
        #[pic("9(4)")]
        pub shelf_count: u16,
        #[occurs(shelf_count)]
        pub shelves: Vec<Shelf>,
    }
}

copybook! {
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Invoice {
        #[pic("X(4)")]
        pub number: String,
        #[group]
        pub stock: Warehouse,
        #[pic("S9(5)COMP-3")]
        pub total: i64,
    }
}

const ORDER_HEADER: usize = 6 + 1 + 10 + 5 + 2;
const ORDER_LINE: usize = 4 + 3 + 2;

fn line(sku: &str, amount: i64, qty: u16) -> OrderLine {
    OrderLine {
        sku: sku.to_string(),
        amount,
        qty,
    }
}

fn sample_order() -> Order {
    Order {
        id: 4711,
        status: b'O',
        ship_to: Address {
            city: "BOSTON".to_string(),
            zip: 2118,
        },
        line_count: 3,
        lines: vec![
            line("A100", -245, 1),
            line("B200", 245, 12),
            line("C3", 0, 65535),
        ],
        note: None,
    }
}

#[test]
fn test_order_round_trip() {
    let order = sample_order();
    let bytes = encode(&order).unwrap();
    assert_eq!(bytes.len(), ORDER_HEADER + 3 * ORDER_LINE);
    assert_eq!(encoded_size(&order).unwrap(), bytes.len());

    let decoded: Order = decode(&bytes).unwrap();
    assert_eq!(decoded, order);
}

#[test]
fn test_order_wire_layout() {
    let bytes = encode(&sample_order()).unwrap();

    // ORDER-ID 9(6): 004711
    assert_eq!(&bytes[..6], &[0xF0, 0xF0, 0xF4, 0xF7, 0xF1, 0xF1]);
    // STATUS X: 'O'
    assert_eq!(bytes[6], 0xD6);
    // CITY X(10): "BOSTON" padded with mainframe blanks
    assert_eq!(&bytes[7..13], &[0xC2, 0xD6, 0xE2, 0xE3, 0xD6, 0xD5]);
    assert!(bytes[13..17].iter().all(|&b| b == 0x40));
    // ZIP 9(5): 02118
    assert_eq!(&bytes[17..22], &[0xF0, 0xF2, 0xF1, 0xF1, 0xF8]);
    // LINE-COUNT S9(4)COMP: halfword 3
    assert_eq!(&bytes[22..24], &[0x00, 0x03]);

    let first = &bytes[ORDER_HEADER..ORDER_HEADER + ORDER_LINE];
    assert_eq!(&first[4..7], &[0x00, 0x24, 0x5D]);
    assert_eq!(&first[7..9], &[0x00, 0x01]);

    let second = &bytes[ORDER_HEADER + ORDER_LINE..ORDER_HEADER + 2 * ORDER_LINE];
    assert_eq!(&second[4..7], &[0x00, 0x24, 0x5C]);
}

#[test]
fn test_empty_repeated_group() {
    let mut order = sample_order();
    order.line_count = 0;
    order.lines.clear();

    let bytes = encode(&order).unwrap();
    assert_eq!(bytes.len(), ORDER_HEADER);

    let decoded: Order = decode(&bytes).unwrap();
    assert!(decoded.lines.is_empty());
    assert_eq!(decoded.ship_to.city, "BOSTON");
}

#[test]
fn test_skipped_field_not_on_wire() {
    let mut order = sample_order();
    order.note = Some("call before delivery".to_string());

    let bytes = encode(&order).unwrap();
    assert_eq!(bytes.len(), ORDER_HEADER + 3 * ORDER_LINE);
    let decoded: Order = decode(&bytes).unwrap();
    assert_eq!(decoded.note, None);
}

#[test]
fn test_count_mismatch_on_encode() {
    let mut order = sample_order();
    order.line_count = 2;

    let err = encode(&order).unwrap_err();
    assert_eq!(
        err,
        CodecError::CountMismatch {
            field: "LINES".to_string(),
            declared: 2,
            actual: 3,
        }
    );
}

#[test]
fn test_negative_count_rejected() {
    let mut order = sample_order();
    order.line_count = -1;
    assert!(matches!(
        encode(&order).unwrap_err(),
        CodecError::InvalidSchema { .. }
    ));
}

#[test]
fn test_truncated_buffer() {
    let bytes = encode(&sample_order()).unwrap();
    let err = decode::<Order>(&bytes[..ORDER_HEADER + ORDER_LINE + 5]).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedInput {
            field: "AMOUNT".to_string(),
            needed: 3,
            available: 1,
        }
    );
}

#[test]
fn test_decode_into_reports_consumed() {
    let mut bytes = encode(&sample_order()).unwrap();
    let expected = bytes.len();
    bytes.extend_from_slice(&[0x00; 16]);

    let mut order = Order::default();
    assert_eq!(decode_into(&bytes, &mut order).unwrap(), expected);
    assert_eq!(order, sample_order());
}

#[test]
fn test_decode_into_untouched_on_error() {
    let bytes = encode(&sample_order()).unwrap();
    let mut order = sample_order();
    order.id = 99;
    let before = order.clone();

    assert!(decode_into(&bytes[..10], &mut order).is_err());
    assert_eq!(order, before);
}

#[test]
fn test_binary_storage_widths() {
    let schema = Widths::schema().unwrap();
    assert_eq!(schema.fixed_size(), Some(2 + 4 + 8));

    let record = Widths {
        half: -2,
        full: 100_000,
        double: -1,
    };
    let bytes = encode(&record).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xFE]);
    assert_eq!(&bytes[2..6], &[0x00, 0x01, 0x86, 0xA0]);
    assert_eq!(&bytes[6..], &[0xFF; 8]);
    assert_eq!(decode::<Widths>(&bytes).unwrap(), record);
}

#[test]
fn test_text_padding_and_trim() {
    let label = Label {
        text: "AB".to_string(),
    };
    let bytes = encode(&label).unwrap();
    assert_eq!(bytes, vec![0xC1, 0xC2, 0x40, 0x40, 0x40]);

    let decoded: Label = decode(&bytes).unwrap();
    assert_eq!(decoded.text, "AB");
}

#[test]
fn test_text_exclamation_override() {
    let decoded: Label = decode(&[0xC8, 0xC9, 0x5A, 0x40, 0x40]).unwrap();
    assert_eq!(decoded.text, "HI!");
}

#[test]
fn test_text_trailing_nul_trimmed() {
    let decoded: Label = decode(&[0xC1, 0x00, 0x00, 0x00, 0x00]).unwrap();
    assert_eq!(decoded.text, "A");
}

#[test]
fn test_fixed_size() {
    assert_eq!(Address::schema().unwrap().fixed_size(), Some(15));
    assert_eq!(Order::schema().unwrap().fixed_size(), None);
}

#[test]
fn test_count_field_must_come_first() {
    let err = CountAfterArray::schema().unwrap_err();
    assert!(matches!(err, CodecError::InvalidSchema { .. }));
    assert!(decode::<CountAfterArray>(&[0xF0; 8]).is_err());
}

#[test]
fn test_malformed_zoned_digits() {
    let mut bytes = encode(&sample_order()).unwrap();
    // 'A' inside ORDER-ID
    bytes[2] = 0xC1;
    assert!(matches!(
        decode::<Order>(&bytes).unwrap_err(),
        CodecError::MalformedNumeric { .. }
    ));
}

#[test]
fn test_dump_listing() {
    let listing = dump(&sample_order()).unwrap();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 5 + 3 * 3);
    assert_eq!(lines[0], "        ORDER-ID : 4711");
    assert_eq!(lines[1], "          STATUS : O");
    assert_eq!(lines[2], "            CITY : BOSTON");
    assert_eq!(lines[5], "             SKU : A100");
    assert_eq!(lines[6], "          AMOUNT : -245");
}

fn label(text: &str) -> Label {
    Label {
        text: text.to_string(),
    }
}

fn sample_invoice() -> Invoice {
    Invoice {
        number: "INV1".to_string(),
        stock: Warehouse {
            shelf_count: 2,
            shelves: vec![
                Shelf {
                    code: "A01".to_string(),
                    count: 2,
                    items: vec![label("BOLT"), label("NUT")],
                },
                Shelf {
                    code: "B02".to_string(),
                    count: 0,
                    items: Vec::new(),
                },
            ],
        },
        total: -9150,
    }
}

#[test]
fn test_count_named_by_display_name() {
    let tally = Tally {
        n: 2,
        labels: vec![label("AB"), label("CD")],
    };
    let bytes = encode(&tally).unwrap();
    assert_eq!(bytes.len(), 2 + 2 * 5);
    assert_eq!(decode::<Tally>(&bytes).unwrap(), tally);

    let decoded: Tally = decode(&[0xF0, 0xF1, 0xC1, 0xC2, 0x40, 0x40, 0x40]).unwrap();
    assert_eq!(decoded.labels, vec![label("AB")]);
}

#[test]
fn test_wire_count_beyond_buffer() {
    // count 5000000, then a single byte pair
    let mut bytes = vec![0xF5];
    bytes.extend_from_slice(&[0xF0; 6]);
    bytes.extend_from_slice(&[0xC1, 0xC2]);

    let err = decode::<Bulk>(&bytes).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedInput {
            field: "LABELS".to_string(),
            needed: 25_000_000,
            available: 2,
        }
    );
}

#[test]
fn test_huge_binary_count_is_truncation() {
    let mut bytes = vec![0x0F];
    bytes.extend_from_slice(&[0xFF; 7]);
    bytes.extend_from_slice(&[0xC1, 0xC2, 0xC3]);

    let err = decode::<Huge>(&bytes).unwrap_err();
    assert!(matches!(
        err,
        CodecError::TruncatedInput { ref field, available: 3, .. } if field == "LABELS"
    ));
}

#[test]
fn test_variable_elements_count_beyond_buffer() {
    // 9999 shelves of at least 4 bytes each, 4 bytes present
    let bytes = [0xF9, 0xF9, 0xF9, 0xF9, 0xC1, 0xF0, 0xF1, 0xF0];
    let err = decode::<Warehouse>(&bytes).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedInput {
            field: "SHELVES".to_string(),
            needed: 9999 * 4,
            available: 4,
        }
    );
}

#[test]
fn test_variable_elements_run_out_mid_group() {
    let mut bytes = encode(&sample_invoice().stock).unwrap();
    // drop the second shelf
    bytes.truncate(4 + 3 + 1 + 2 * 5);

    let err = decode::<Warehouse>(&bytes).unwrap_err();
    assert_eq!(
        err,
        CodecError::TruncatedInput {
            field: "CODE".to_string(),
            needed: 3,
            available: 0,
        }
    );
}

#[test]
fn test_repeated_group_inside_group() {
    let invoice = sample_invoice();
    let bytes = encode(&invoice).unwrap();
    assert_eq!(bytes.len(), 4 + 4 + (3 + 1 + 2 * 5) + (3 + 1) + 3);
    assert_eq!(encoded_size(&invoice).unwrap(), bytes.len());
    assert_eq!(Invoice::schema().unwrap().fixed_size(), None);

    let decoded: Invoice = decode(&bytes).unwrap();
    assert_eq!(decoded, invoice);
    assert_eq!(decoded.stock.shelves[0].items[1].text, "NUT");
}
