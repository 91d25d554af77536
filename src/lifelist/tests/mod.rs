//! Shared fixtures for life list tests


/// Header of a current eBird life list export
pub const EXPORT_HEADER: &str = "Row #,Taxon Order,Category,Common Name,Scientific Name,Count,Location,S/P,Date,LocID,SubID,Exotic,Countable";

/// Two-species export in eBird's newest-first order
pub fn sample_export() -> String {
    format!(
        "{}\n{}\n{}\n",
        EXPORT_HEADER,
        r#"1,3764,species,Australian Owlet-nightjar,Aegotheles cristatus,1,"Finland Road, Paradise Waters",AU-QLD,12 Aug 2023,L3862700,S147015015,,1"#,
        "2,5817,species,Double-banded Plover,Charadrius bicinctus,1,Maroochy River Mouth north side,AU-QLD,11 Aug 2023,L3801739,S146953601,,1",
    )
}

/// Export mixing species with spuh, slash and domestic rows
pub fn mixed_category_export() -> String {
    [
        EXPORT_HEADER,
        "1,20104,species,Australian Magpie,Gymnorhina tibicen,3,Royal Park,AU-VIC,20 Jul 2023,L901738,S145000001,,1",
        "2,6544,spuh,gull sp.,Larus sp.,1,St Kilda Pier,AU-VIC,19 Jul 2023,L921111,S145000002,,0",
        "3,14750,species,Galah,Eolophus roseicapilla,12,Royal Park,AU-VIC,18 Jul 2023,L901738,S145000003,,1",
        "4,2255,domestic,Rock Pigeon (Feral Pigeon),Columba livia (Feral Pigeon),X,Flinders Street,AU-VIC,17 Jul 2023,L999999,S145000004,N,0",
        "5,15520,species,Laughing Kookaburra,Dacelo novaeguineae,2,Yarra Bend,AU-VIC,16 Jul 2023,L912345,S145000005,,1",
    ]
    .join("\n")
}
