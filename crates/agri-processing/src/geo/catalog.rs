//! Built-in ISO-3166 country catalog.
//!
//! Lookup is case-insensitive over the short name, official name, common
//! aliases and both ISO codes. Territories that have no continent assignment
//! (Antarctica itself, the French Southern Territories, Western Sahara and a
//! few others) are in the catalog but resolve to no continent.

use super::{Continent, ContinentResolver};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use Continent::{
    Africa as AF, Antarctica as AN, Asia as AS, Europe as EU, NorthAmerica as NA, Oceania as OC,
    SouthAmerica as SA,
};

/// One row of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountryRecord {
    pub alpha2: &'static str,
    pub alpha3: &'static str,
    pub name: &'static str,
    pub official_name: Option<&'static str>,
    pub aliases: &'static [&'static str],
    pub continent: Option<Continent>,
}

const fn entry(
    alpha2: &'static str,
    alpha3: &'static str,
    name: &'static str,
    official_name: Option<&'static str>,
    aliases: &'static [&'static str],
    continent: Option<Continent>,
) -> CountryRecord {
    CountryRecord {
        alpha2,
        alpha3,
        name,
        official_name,
        aliases,
        continent,
    }
}

#[rustfmt::skip]
static COUNTRIES: &[CountryRecord] = &[
    entry("AF", "AFG", "Afghanistan", Some("Islamic Republic of Afghanistan"), &[], Some(AS)),
    entry("AX", "ALA", "Åland Islands", None, &["Aland Islands"], Some(EU)),
    entry("AL", "ALB", "Albania", Some("Republic of Albania"), &[], Some(EU)),
    entry("DZ", "DZA", "Algeria", Some("People's Democratic Republic of Algeria"), &[], Some(AF)),
    entry("AS", "ASM", "American Samoa", None, &[], Some(OC)),
    entry("AD", "AND", "Andorra", Some("Principality of Andorra"), &[], Some(EU)),
    entry("AO", "AGO", "Angola", Some("Republic of Angola"), &[], Some(AF)),
    entry("AI", "AIA", "Anguilla", None, &[], Some(NA)),
    entry("AQ", "ATA", "Antarctica", None, &[], None),
    entry("AG", "ATG", "Antigua and Barbuda", None, &[], Some(NA)),
    entry("AR", "ARG", "Argentina", Some("Argentine Republic"), &[], Some(SA)),
    entry("AM", "ARM", "Armenia", Some("Republic of Armenia"), &[], Some(AS)),
    entry("AW", "ABW", "Aruba", None, &[], Some(NA)),
    entry("AU", "AUS", "Australia", None, &[], Some(OC)),
    entry("AT", "AUT", "Austria", Some("Republic of Austria"), &[], Some(EU)),
    entry("AZ", "AZE", "Azerbaijan", Some("Republic of Azerbaijan"), &[], Some(AS)),
    entry("BS", "BHS", "Bahamas", Some("Commonwealth of the Bahamas"), &[], Some(NA)),
    entry("BH", "BHR", "Bahrain", Some("Kingdom of Bahrain"), &[], Some(AS)),
    entry("BD", "BGD", "Bangladesh", Some("People's Republic of Bangladesh"), &[], Some(AS)),
    entry("BB", "BRB", "Barbados", None, &[], Some(NA)),
    entry("BY", "BLR", "Belarus", Some("Republic of Belarus"), &[], Some(EU)),
    entry("BE", "BEL", "Belgium", Some("Kingdom of Belgium"), &[], Some(EU)),
    entry("BZ", "BLZ", "Belize", None, &[], Some(NA)),
    entry("BJ", "BEN", "Benin", Some("Republic of Benin"), &[], Some(AF)),
    entry("BM", "BMU", "Bermuda", None, &[], Some(NA)),
    entry("BT", "BTN", "Bhutan", Some("Kingdom of Bhutan"), &[], Some(AS)),
    entry("BO", "BOL", "Bolivia, Plurinational State of", Some("Plurinational State of Bolivia"), &["Bolivia"], Some(SA)),
    entry("BQ", "BES", "Bonaire, Sint Eustatius and Saba", None, &[], Some(NA)),
    entry("BA", "BIH", "Bosnia and Herzegovina", Some("Republic of Bosnia and Herzegovina"), &[], Some(EU)),
    entry("BW", "BWA", "Botswana", Some("Republic of Botswana"), &[], Some(AF)),
    entry("BV", "BVT", "Bouvet Island", None, &[], Some(AN)),
    entry("BR", "BRA", "Brazil", Some("Federative Republic of Brazil"), &[], Some(SA)),
    entry("IO", "IOT", "British Indian Ocean Territory", None, &[], Some(AS)),
    entry("BN", "BRN", "Brunei Darussalam", None, &["Brunei"], Some(AS)),
    entry("BG", "BGR", "Bulgaria", Some("Republic of Bulgaria"), &[], Some(EU)),
    entry("BF", "BFA", "Burkina Faso", None, &[], Some(AF)),
    entry("BI", "BDI", "Burundi", Some("Republic of Burundi"), &[], Some(AF)),
    entry("CV", "CPV", "Cabo Verde", Some("Republic of Cabo Verde"), &["Cape Verde"], Some(AF)),
    entry("KH", "KHM", "Cambodia", Some("Kingdom of Cambodia"), &[], Some(AS)),
    entry("CM", "CMR", "Cameroon", Some("Republic of Cameroon"), &[], Some(AF)),
    entry("CA", "CAN", "Canada", None, &[], Some(NA)),
    entry("KY", "CYM", "Cayman Islands", None, &[], Some(NA)),
    entry("CF", "CAF", "Central African Republic", None, &[], Some(AF)),
    entry("TD", "TCD", "Chad", Some("Republic of Chad"), &[], Some(AF)),
    entry("CL", "CHL", "Chile", Some("Republic of Chile"), &[], Some(SA)),
    entry("CN", "CHN", "China", Some("People's Republic of China"), &[], Some(AS)),
    entry("CX", "CXR", "Christmas Island", None, &[], Some(AS)),
    entry("CC", "CCK", "Cocos (Keeling) Islands", None, &[], Some(AS)),
    entry("CO", "COL", "Colombia", Some("Republic of Colombia"), &[], Some(SA)),
    entry("KM", "COM", "Comoros", Some("Union of the Comoros"), &[], Some(AF)),
    entry("CG", "COG", "Congo", Some("Republic of the Congo"), &[], Some(AF)),
    entry("CD", "COD", "Congo, The Democratic Republic of the", Some("Democratic Republic of the Congo"), &[], Some(AF)),
    entry("CK", "COK", "Cook Islands", None, &[], Some(OC)),
    entry("CR", "CRI", "Costa Rica", Some("Republic of Costa Rica"), &[], Some(NA)),
    entry("CI", "CIV", "Côte d'Ivoire", Some("Republic of Côte d'Ivoire"), &["Ivory Coast"], Some(AF)),
    entry("HR", "HRV", "Croatia", Some("Republic of Croatia"), &[], Some(EU)),
    entry("CU", "CUB", "Cuba", Some("Republic of Cuba"), &[], Some(NA)),
    entry("CW", "CUW", "Curaçao", None, &["Curacao"], Some(NA)),
    entry("CY", "CYP", "Cyprus", Some("Republic of Cyprus"), &[], Some(AS)),
    entry("CZ", "CZE", "Czechia", Some("Czech Republic"), &[], Some(EU)),
    entry("DK", "DNK", "Denmark", Some("Kingdom of Denmark"), &[], Some(EU)),
    entry("DJ", "DJI", "Djibouti", Some("Republic of Djibouti"), &[], Some(AF)),
    entry("DM", "DMA", "Dominica", Some("Commonwealth of Dominica"), &[], Some(NA)),
    entry("DO", "DOM", "Dominican Republic", None, &[], Some(NA)),
    entry("EC", "ECU", "Ecuador", Some("Republic of Ecuador"), &[], Some(SA)),
    entry("EG", "EGY", "Egypt", Some("Arab Republic of Egypt"), &[], Some(AF)),
    entry("SV", "SLV", "El Salvador", Some("Republic of El Salvador"), &[], Some(NA)),
    entry("GQ", "GNQ", "Equatorial Guinea", Some("Republic of Equatorial Guinea"), &[], Some(AF)),
    entry("ER", "ERI", "Eritrea", Some("the State of Eritrea"), &[], Some(AF)),
    entry("EE", "EST", "Estonia", Some("Republic of Estonia"), &[], Some(EU)),
    entry("SZ", "SWZ", "Eswatini", Some("Kingdom of Eswatini"), &["Swaziland"], Some(AF)),
    entry("ET", "ETH", "Ethiopia", Some("Federal Democratic Republic of Ethiopia"), &[], Some(AF)),
    entry("FK", "FLK", "Falkland Islands (Malvinas)", None, &[], Some(SA)),
    entry("FO", "FRO", "Faroe Islands", None, &[], Some(EU)),
    entry("FJ", "FJI", "Fiji", Some("Republic of Fiji"), &[], Some(OC)),
    entry("FI", "FIN", "Finland", Some("Republic of Finland"), &[], Some(EU)),
    entry("FR", "FRA", "France", Some("French Republic"), &[], Some(EU)),
    entry("GF", "GUF", "French Guiana", None, &[], Some(SA)),
    entry("PF", "PYF", "French Polynesia", None, &[], Some(OC)),
    entry("TF", "ATF", "French Southern Territories", None, &[], None),
    entry("GA", "GAB", "Gabon", Some("Gabonese Republic"), &[], Some(AF)),
    entry("GM", "GMB", "Gambia", Some("Republic of the Gambia"), &[], Some(AF)),
    entry("GE", "GEO", "Georgia", None, &[], Some(AS)),
    entry("DE", "DEU", "Germany", Some("Federal Republic of Germany"), &[], Some(EU)),
    entry("GH", "GHA", "Ghana", Some("Republic of Ghana"), &[], Some(AF)),
    entry("GI", "GIB", "Gibraltar", None, &[], Some(EU)),
    entry("GR", "GRC", "Greece", Some("Hellenic Republic"), &[], Some(EU)),
    entry("GL", "GRL", "Greenland", None, &[], Some(NA)),
    entry("GD", "GRD", "Grenada", None, &[], Some(NA)),
    entry("GP", "GLP", "Guadeloupe", None, &[], Some(NA)),
    entry("GU", "GUM", "Guam", None, &[], Some(OC)),
    entry("GT", "GTM", "Guatemala", Some("Republic of Guatemala"), &[], Some(NA)),
    entry("GG", "GGY", "Guernsey", None, &[], Some(EU)),
    entry("GN", "GIN", "Guinea", Some("Republic of Guinea"), &[], Some(AF)),
    entry("GW", "GNB", "Guinea-Bissau", Some("Republic of Guinea-Bissau"), &[], Some(AF)),
    entry("GY", "GUY", "Guyana", Some("Republic of Guyana"), &[], Some(SA)),
    entry("HT", "HTI", "Haiti", Some("Republic of Haiti"), &[], Some(NA)),
    entry("HM", "HMD", "Heard Island and McDonald Islands", None, &[], Some(AN)),
    entry("VA", "VAT", "Holy See (Vatican City State)", None, &["Vatican", "Holy See"], None),
    entry("HN", "HND", "Honduras", Some("Republic of Honduras"), &[], Some(NA)),
    entry("HK", "HKG", "Hong Kong", Some("Hong Kong Special Administrative Region of China"), &[], Some(AS)),
    entry("HU", "HUN", "Hungary", None, &[], Some(EU)),
    entry("IS", "ISL", "Iceland", Some("Republic of Iceland"), &[], Some(EU)),
    entry("IN", "IND", "India", Some("Republic of India"), &[], Some(AS)),
    entry("ID", "IDN", "Indonesia", Some("Republic of Indonesia"), &[], Some(AS)),
    entry("IR", "IRN", "Iran, Islamic Republic of", Some("Islamic Republic of Iran"), &["Iran"], Some(AS)),
    entry("IQ", "IRQ", "Iraq", Some("Republic of Iraq"), &[], Some(AS)),
    entry("IE", "IRL", "Ireland", None, &[], Some(EU)),
    entry("IM", "IMN", "Isle of Man", None, &[], Some(EU)),
    entry("IL", "ISR", "Israel", Some("State of Israel"), &[], Some(AS)),
    entry("IT", "ITA", "Italy", Some("Italian Republic"), &[], Some(EU)),
    entry("JM", "JAM", "Jamaica", None, &[], Some(NA)),
    entry("JP", "JPN", "Japan", None, &[], Some(AS)),
    entry("JE", "JEY", "Jersey", None, &[], Some(EU)),
    entry("JO", "JOR", "Jordan", Some("Hashemite Kingdom of Jordan"), &[], Some(AS)),
    entry("KZ", "KAZ", "Kazakhstan", Some("Republic of Kazakhstan"), &[], Some(AS)),
    entry("KE", "KEN", "Kenya", Some("Republic of Kenya"), &[], Some(AF)),
    entry("KI", "KIR", "Kiribati", Some("Republic of Kiribati"), &[], Some(OC)),
    entry("KP", "PRK", "Korea, Democratic People's Republic of", Some("Democratic People's Republic of Korea"), &["North Korea"], Some(AS)),
    entry("KR", "KOR", "Korea, Republic of", None, &["South Korea"], Some(AS)),
    entry("KW", "KWT", "Kuwait", Some("State of Kuwait"), &[], Some(AS)),
    entry("KG", "KGZ", "Kyrgyzstan", Some("Kyrgyz Republic"), &[], Some(AS)),
    entry("LA", "LAO", "Lao People's Democratic Republic", None, &["Laos"], Some(AS)),
    entry("LV", "LVA", "Latvia", Some("Republic of Latvia"), &[], Some(EU)),
    entry("LB", "LBN", "Lebanon", Some("Lebanese Republic"), &[], Some(AS)),
    entry("LS", "LSO", "Lesotho", Some("Kingdom of Lesotho"), &[], Some(AF)),
    entry("LR", "LBR", "Liberia", Some("Republic of Liberia"), &[], Some(AF)),
    entry("LY", "LBY", "Libya", None, &[], Some(AF)),
    entry("LI", "LIE", "Liechtenstein", Some("Principality of Liechtenstein"), &[], Some(EU)),
    entry("LT", "LTU", "Lithuania", Some("Republic of Lithuania"), &[], Some(EU)),
    entry("LU", "LUX", "Luxembourg", Some("Grand Duchy of Luxembourg"), &[], Some(EU)),
    entry("MO", "MAC", "Macao", Some("Macao Special Administrative Region of China"), &["Macau"], Some(AS)),
    entry("MG", "MDG", "Madagascar", Some("Republic of Madagascar"), &[], Some(AF)),
    entry("MW", "MWI", "Malawi", Some("Republic of Malawi"), &[], Some(AF)),
    entry("MY", "MYS", "Malaysia", None, &[], Some(AS)),
    entry("MV", "MDV", "Maldives", Some("Republic of Maldives"), &[], Some(AS)),
    entry("ML", "MLI", "Mali", Some("Republic of Mali"), &[], Some(AF)),
    entry("MT", "MLT", "Malta", Some("Republic of Malta"), &[], Some(EU)),
    entry("MH", "MHL", "Marshall Islands", Some("Republic of the Marshall Islands"), &[], Some(OC)),
    entry("MQ", "MTQ", "Martinique", None, &[], Some(NA)),
    entry("MR", "MRT", "Mauritania", Some("Islamic Republic of Mauritania"), &[], Some(AF)),
    entry("MU", "MUS", "Mauritius", Some("Republic of Mauritius"), &[], Some(AF)),
    entry("YT", "MYT", "Mayotte", None, &[], Some(AF)),
    entry("MX", "MEX", "Mexico", Some("United Mexican States"), &[], Some(NA)),
    entry("FM", "FSM", "Micronesia, Federated States of", Some("Federated States of Micronesia"), &["Micronesia"], Some(OC)),
    entry("MD", "MDA", "Moldova, Republic of", Some("Republic of Moldova"), &["Moldova"], Some(EU)),
    entry("MC", "MCO", "Monaco", Some("Principality of Monaco"), &[], Some(EU)),
    entry("MN", "MNG", "Mongolia", None, &[], Some(AS)),
    entry("ME", "MNE", "Montenegro", None, &[], Some(EU)),
    entry("MS", "MSR", "Montserrat", None, &[], Some(NA)),
    entry("MA", "MAR", "Morocco", Some("Kingdom of Morocco"), &[], Some(AF)),
    entry("MZ", "MOZ", "Mozambique", Some("Republic of Mozambique"), &[], Some(AF)),
    entry("MM", "MMR", "Myanmar", Some("Republic of Myanmar"), &["Burma"], Some(AS)),
    entry("NA", "NAM", "Namibia", Some("Republic of Namibia"), &[], Some(AF)),
    entry("NR", "NRU", "Nauru", Some("Republic of Nauru"), &[], Some(OC)),
    entry("NP", "NPL", "Nepal", Some("Federal Democratic Republic of Nepal"), &[], Some(AS)),
    entry("NL", "NLD", "Netherlands", Some("Kingdom of the Netherlands"), &[], Some(EU)),
    entry("NC", "NCL", "New Caledonia", None, &[], Some(OC)),
    entry("NZ", "NZL", "New Zealand", None, &[], Some(OC)),
    entry("NI", "NIC", "Nicaragua", Some("Republic of Nicaragua"), &[], Some(NA)),
    entry("NE", "NER", "Niger", Some("Republic of the Niger"), &[], Some(AF)),
    entry("NG", "NGA", "Nigeria", Some("Federal Republic of Nigeria"), &[], Some(AF)),
    entry("NU", "NIU", "Niue", None, &[], Some(OC)),
    entry("NF", "NFK", "Norfolk Island", None, &[], Some(OC)),
    entry("MK", "MKD", "North Macedonia", Some("Republic of North Macedonia"), &["Macedonia"], Some(EU)),
    entry("MP", "MNP", "Northern Mariana Islands", Some("Commonwealth of the Northern Mariana Islands"), &[], Some(OC)),
    entry("NO", "NOR", "Norway", Some("Kingdom of Norway"), &[], Some(EU)),
    entry("OM", "OMN", "Oman", Some("Sultanate of Oman"), &[], Some(AS)),
    entry("PK", "PAK", "Pakistan", Some("Islamic Republic of Pakistan"), &[], Some(AS)),
    entry("PW", "PLW", "Palau", Some("Republic of Palau"), &[], Some(OC)),
    entry("PS", "PSE", "Palestine, State of", Some("the State of Palestine"), &["Palestine"], Some(AS)),
    entry("PA", "PAN", "Panama", Some("Republic of Panama"), &[], Some(NA)),
    entry("PG", "PNG", "Papua New Guinea", Some("Independent State of Papua New Guinea"), &[], Some(OC)),
    entry("PY", "PRY", "Paraguay", Some("Republic of Paraguay"), &[], Some(SA)),
    entry("PE", "PER", "Peru", Some("Republic of Peru"), &[], Some(SA)),
    entry("PH", "PHL", "Philippines", Some("Republic of the Philippines"), &[], Some(AS)),
    entry("PN", "PCN", "Pitcairn", None, &[], None),
    entry("PL", "POL", "Poland", Some("Republic of Poland"), &[], Some(EU)),
    entry("PT", "PRT", "Portugal", Some("Portuguese Republic"), &[], Some(EU)),
    entry("PR", "PRI", "Puerto Rico", None, &[], Some(NA)),
    entry("QA", "QAT", "Qatar", Some("State of Qatar"), &[], Some(AS)),
    entry("RE", "REU", "Réunion", None, &["Reunion"], Some(AF)),
    entry("RO", "ROU", "Romania", None, &[], Some(EU)),
    entry("RU", "RUS", "Russian Federation", None, &["Russia"], Some(EU)),
    entry("RW", "RWA", "Rwanda", Some("Rwandese Republic"), &[], Some(AF)),
    entry("BL", "BLM", "Saint Barthélemy", None, &[], Some(NA)),
    entry("SH", "SHN", "Saint Helena, Ascension and Tristan da Cunha", None, &[], Some(AF)),
    entry("KN", "KNA", "Saint Kitts and Nevis", None, &[], Some(NA)),
    entry("LC", "LCA", "Saint Lucia", None, &[], Some(NA)),
    entry("MF", "MAF", "Saint Martin (French part)", None, &[], Some(NA)),
    entry("PM", "SPM", "Saint Pierre and Miquelon", None, &[], Some(NA)),
    entry("VC", "VCT", "Saint Vincent and the Grenadines", None, &[], Some(NA)),
    entry("WS", "WSM", "Samoa", Some("Independent State of Samoa"), &[], Some(OC)),
    entry("SM", "SMR", "San Marino", Some("Republic of San Marino"), &[], Some(EU)),
    entry("ST", "STP", "Sao Tome and Principe", Some("Democratic Republic of Sao Tome and Principe"), &[], Some(AF)),
    entry("SA", "SAU", "Saudi Arabia", Some("Kingdom of Saudi Arabia"), &[], Some(AS)),
    entry("SN", "SEN", "Senegal", Some("Republic of Senegal"), &[], Some(AF)),
    entry("RS", "SRB", "Serbia", Some("Republic of Serbia"), &[], Some(EU)),
    entry("SC", "SYC", "Seychelles", Some("Republic of Seychelles"), &[], Some(AF)),
    entry("SL", "SLE", "Sierra Leone", Some("Republic of Sierra Leone"), &[], Some(AF)),
    entry("SG", "SGP", "Singapore", Some("Republic of Singapore"), &[], Some(AS)),
    entry("SX", "SXM", "Sint Maarten (Dutch part)", None, &[], None),
    entry("SK", "SVK", "Slovakia", Some("Slovak Republic"), &[], Some(EU)),
    entry("SI", "SVN", "Slovenia", Some("Republic of Slovenia"), &[], Some(EU)),
    entry("SB", "SLB", "Solomon Islands", None, &[], Some(OC)),
    entry("SO", "SOM", "Somalia", Some("Federal Republic of Somalia"), &[], Some(AF)),
    entry("ZA", "ZAF", "South Africa", Some("Republic of South Africa"), &[], Some(AF)),
    entry("GS", "SGS", "South Georgia and the South Sandwich Islands", None, &[], Some(AN)),
    entry("SS", "SSD", "South Sudan", Some("Republic of South Sudan"), &[], Some(AF)),
    entry("ES", "ESP", "Spain", Some("Kingdom of Spain"), &[], Some(EU)),
    entry("LK", "LKA", "Sri Lanka", Some("Democratic Socialist Republic of Sri Lanka"), &[], Some(AS)),
    entry("SD", "SDN", "Sudan", Some("Republic of the Sudan"), &[], Some(AF)),
    entry("SR", "SUR", "Suriname", Some("Republic of Suriname"), &[], Some(SA)),
    entry("SJ", "SJM", "Svalbard and Jan Mayen", None, &[], Some(EU)),
    entry("SE", "SWE", "Sweden", Some("Kingdom of Sweden"), &[], Some(EU)),
    entry("CH", "CHE", "Switzerland", Some("Swiss Confederation"), &[], Some(EU)),
    entry("SY", "SYR", "Syrian Arab Republic", None, &["Syria"], Some(AS)),
    entry("TW", "TWN", "Taiwan, Province of China", None, &["Taiwan"], Some(AS)),
    entry("TJ", "TJK", "Tajikistan", Some("Republic of Tajikistan"), &[], Some(AS)),
    entry("TZ", "TZA", "Tanzania, United Republic of", Some("United Republic of Tanzania"), &["Tanzania"], Some(AF)),
    entry("TH", "THA", "Thailand", Some("Kingdom of Thailand"), &[], Some(AS)),
    entry("TL", "TLS", "Timor-Leste", Some("Democratic Republic of Timor-Leste"), &["East Timor"], None),
    entry("TG", "TGO", "Togo", Some("Togolese Republic"), &[], Some(AF)),
    entry("TK", "TKL", "Tokelau", None, &[], Some(OC)),
    entry("TO", "TON", "Tonga", Some("Kingdom of Tonga"), &[], Some(OC)),
    entry("TT", "TTO", "Trinidad and Tobago", Some("Republic of Trinidad and Tobago"), &[], Some(NA)),
    entry("TN", "TUN", "Tunisia", Some("Republic of Tunisia"), &[], Some(AF)),
    entry("TR", "TUR", "Türkiye", Some("Republic of Türkiye"), &["Turkey"], Some(AS)),
    entry("TM", "TKM", "Turkmenistan", None, &[], Some(AS)),
    entry("TC", "TCA", "Turks and Caicos Islands", None, &[], Some(NA)),
    entry("TV", "TUV", "Tuvalu", None, &[], Some(OC)),
    entry("UG", "UGA", "Uganda", Some("Republic of Uganda"), &[], Some(AF)),
    entry("UA", "UKR", "Ukraine", None, &[], Some(EU)),
    entry("AE", "ARE", "United Arab Emirates", None, &[], Some(AS)),
    entry("GB", "GBR", "United Kingdom", Some("United Kingdom of Great Britain and Northern Ireland"), &["UK", "Great Britain"], Some(EU)),
    entry("US", "USA", "United States", Some("United States of America"), &["USA"], Some(NA)),
    entry("UM", "UMI", "United States Minor Outlying Islands", None, &[], None),
    entry("UY", "URY", "Uruguay", Some("Eastern Republic of Uruguay"), &[], Some(SA)),
    entry("UZ", "UZB", "Uzbekistan", Some("Republic of Uzbekistan"), &[], Some(AS)),
    entry("VU", "VUT", "Vanuatu", Some("Republic of Vanuatu"), &[], Some(OC)),
    entry("VE", "VEN", "Venezuela, Bolivarian Republic of", Some("Bolivarian Republic of Venezuela"), &["Venezuela"], Some(SA)),
    entry("VN", "VNM", "Viet Nam", Some("Socialist Republic of Viet Nam"), &["Vietnam"], Some(AS)),
    entry("VG", "VGB", "Virgin Islands, British", Some("British Virgin Islands"), &[], Some(NA)),
    entry("VI", "VIR", "Virgin Islands, U.S.", Some("Virgin Islands of the United States"), &[], Some(NA)),
    entry("WF", "WLF", "Wallis and Futuna", None, &[], Some(OC)),
    entry("EH", "ESH", "Western Sahara", None, &[], None),
    entry("YE", "YEM", "Yemen", Some("Republic of Yemen"), &[], Some(AS)),
    entry("ZM", "ZMB", "Zambia", Some("Republic of Zambia"), &[], Some(AF)),
    entry("ZW", "ZWE", "Zimbabwe", Some("Republic of Zimbabwe"), &[], Some(AF)),
];

static SHARED: Lazy<Arc<CountryCatalog>> = Lazy::new(|| Arc::new(CountryCatalog::new()));

/// Case-insensitive index over [`COUNTRIES`].
#[derive(Debug)]
pub struct CountryCatalog {
    index: HashMap<String, usize>,
}

impl Default for CountryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CountryCatalog {
    pub fn new() -> Self {
        let mut index = HashMap::with_capacity(COUNTRIES.len() * 4);
        for (i, record) in COUNTRIES.iter().enumerate() {
            let keys = [record.alpha2, record.alpha3, record.name]
                .into_iter()
                .chain(record.official_name)
                .chain(record.aliases.iter().copied());
            for key in keys {
                index.entry(normalize(key)).or_insert(i);
            }
        }
        debug!("Indexed {} countries under {} names", COUNTRIES.len(), index.len());
        Self { index }
    }

    /// The process-wide catalog, built on first use.
    pub fn shared() -> Arc<CountryCatalog> {
        Arc::clone(&SHARED)
    }

    pub fn len(&self) -> usize {
        COUNTRIES.len()
    }

    pub fn is_empty(&self) -> bool {
        COUNTRIES.is_empty()
    }

    /// Find a country by name, official name, alias or ISO code.
    pub fn lookup(&self, name: &str) -> Option<&'static CountryRecord> {
        self.index.get(&normalize(name)).map(|&i| &COUNTRIES[i])
    }

    /// Continent of an ISO alpha-2 code.
    pub fn continent_of_alpha2(&self, alpha2: &str) -> Option<Continent> {
        self.lookup(alpha2)
            .filter(|r| r.alpha2.eq_ignore_ascii_case(alpha2.trim()))
            .and_then(|r| r.continent)
    }
}

impl ContinentResolver for CountryCatalog {
    fn resolve_continent(&self, country: &str) -> Option<Continent> {
        let record = self.lookup(country)?;
        self.continent_of_alpha2(record.alpha2)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_common_countries() {
        let catalog = CountryCatalog::new();
        assert_eq!(catalog.resolve_continent("Germany"), Some(Continent::Europe));
        assert_eq!(catalog.resolve_continent("Kenya"), Some(Continent::Africa));
        assert_eq!(catalog.resolve_continent("Brazil"), Some(Continent::SouthAmerica));
        assert_eq!(catalog.resolve_continent("Canada"), Some(Continent::NorthAmerica));
        assert_eq!(catalog.resolve_continent("Australia"), Some(Continent::Oceania));
        assert_eq!(catalog.resolve_continent("Japan"), Some(Continent::Asia));
    }

    #[test]
    fn test_lookup_is_case_insensitive_over_all_names() {
        let catalog = CountryCatalog::new();
        for name in ["côte d'ivoire", "Côte D'Ivoire", "CIV", "ci", "Republic of Côte d'Ivoire"] {
            assert_eq!(catalog.lookup(name).map(|r| r.alpha2), Some("CI"), "{name}");
        }
        assert_eq!(catalog.lookup("  viet nam ").map(|r| r.alpha3), Some("VNM"));
        assert_eq!(catalog.lookup("Bolivia").map(|r| r.alpha2), Some("BO"));
    }

    #[test]
    fn test_former_and_colloquial_names_resolve() {
        let catalog = CountryCatalog::new();
        for (name, alpha2) in [
            ("Swaziland", "SZ"),
            ("Ivory Coast", "CI"),
            ("Turkey", "TR"),
            ("UK", "GB"),
            ("Great Britain", "GB"),
            ("Macedonia", "MK"),
            ("Cape Verde", "CV"),
        ] {
            assert_eq!(catalog.lookup(name).map(|r| r.alpha2), Some(alpha2), "{name}");
        }
        assert_eq!(catalog.resolve_continent("Swaziland"), Some(Continent::Africa));
    }

    #[test]
    fn test_unknown_names_resolve_to_none() {
        let catalog = CountryCatalog::new();
        assert_eq!(catalog.resolve_continent("Atlantis"), None);
        assert_eq!(catalog.resolve_continent(""), None);
        assert_eq!(catalog.resolve_continent("Bolivia (Plurinational State of)"), None);
    }

    #[test]
    fn test_territories_without_continent() {
        let catalog = CountryCatalog::new();
        for code in ["AQ", "TF", "UM", "EH", "TL", "SX", "VA", "PN"] {
            assert!(catalog.lookup(code).is_some(), "{code} missing from catalog");
            assert_eq!(catalog.continent_of_alpha2(code), None, "{code}");
        }
        assert_eq!(catalog.resolve_continent("Western Sahara"), None);
    }

    #[test]
    fn test_codes_are_unique() {
        let mut alpha2: Vec<&str> = COUNTRIES.iter().map(|r| r.alpha2).collect();
        alpha2.sort_unstable();
        alpha2.dedup();
        assert_eq!(alpha2.len(), COUNTRIES.len());
        assert!(COUNTRIES.iter().all(|r| r.alpha2.len() == 2 && r.alpha3.len() == 3));
    }

    #[test]
    fn test_shared_catalog_is_reused() {
        let a = CountryCatalog::shared();
        let b = CountryCatalog::shared();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.len(), COUNTRIES.len());
    }
}
