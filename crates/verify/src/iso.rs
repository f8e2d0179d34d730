//! ISO 639 language codes and IETF locale tags accepted by PingOne.

/// A language or locale code with its display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsoLanguage {
    /// Code, e.g. `en` or `en-US`
    pub code: &'static str,
    /// Display name
    pub name: &'static str,
}

/// Languages PingOne ships translations for; they cannot be customised.
pub const RESERVED_LANGUAGE_CODES: &[&str] = &[
    "cs",
    "de",
    "en",
    "es",
    "fr-CA",
    "fr",
    "hu",
    "it",
    "ja",
    "ko",
    "nl",
    "pl",
    "pt",
    "ru",
    "th",
    "tr",
    "zh",
];

/// Every language and locale code PingOne accepts.
pub const ISO_LANGUAGES: &[IsoLanguage] = &[
    IsoLanguage { code: "aa", name: "Afar" },
    IsoLanguage { code: "ab", name: "Abkhazian" },
    IsoLanguage { code: "ae", name: "Avestan" },
    IsoLanguage { code: "af", name: "Afrikaans" },
    IsoLanguage { code: "af-ZA", name: "Afrikaans (South Africa)" },
    IsoLanguage { code: "ak", name: "Akan" },
    IsoLanguage { code: "am", name: "Amharic" },
    IsoLanguage { code: "an", name: "Aragonese" },
    IsoLanguage { code: "ar", name: "Arabic" },
    IsoLanguage { code: "ar-AE", name: "Arabic (U.A.E.)" },
    IsoLanguage { code: "ar-BH", name: "Arabic (Bahrain)" },
    IsoLanguage { code: "ar-DZ", name: "Arabic (Algeria)" },
    IsoLanguage { code: "ar-EG", name: "Arabic (Egypt)" },
    IsoLanguage { code: "ar-IQ", name: "Arabic (Iraq)" },
    IsoLanguage { code: "ar-JO", name: "Arabic (Jordan)" },
    IsoLanguage { code: "ar-KW", name: "Arabic (Kuwait)" },
    IsoLanguage { code: "ar-LB", name: "Arabic (Lebanon)" },
    IsoLanguage { code: "ar-LY", name: "Arabic (Libya)" },
    IsoLanguage { code: "ar-MA", name: "Arabic (Morocco)" },
    IsoLanguage { code: "ar-OM", name: "Arabic (Oman)" },
    IsoLanguage { code: "ar-QA", name: "Arabic (Qatar)" },
    IsoLanguage { code: "ar-SA", name: "Arabic (Saudi Arabia)" },
    IsoLanguage { code: "ar-SY", name: "Arabic (Syria)" },
    IsoLanguage { code: "ar-TN", name: "Arabic (Tunisia)" },
    IsoLanguage { code: "ar-YE", name: "Arabic (Yemen)" },
    IsoLanguage { code: "as", name: "Assamese" },
    IsoLanguage { code: "av", name: "Avaric" },
    IsoLanguage { code: "ay", name: "Aymara" },
    IsoLanguage { code: "az", name: "Azeri (Latin)" },
    IsoLanguage { code: "az-AZ", name: "Azeri (Latin) (Azerbaijan)" },
    IsoLanguage { code: "ba", name: "Bashkir" },
    IsoLanguage { code: "be", name: "Belarusian" },
    IsoLanguage { code: "be-BY", name: "Belarusian (Belarus)" },
    IsoLanguage { code: "bg", name: "Bulgarian" },
    IsoLanguage { code: "bg-BG", name: "Bulgarian (Bulgaria)" },
    IsoLanguage { code: "bi", name: "Bislama" },
    IsoLanguage { code: "bm", name: "Bambara" },
    IsoLanguage { code: "bn", name: "Bengali" },
    IsoLanguage { code: "bo", name: "Tibetan" },
    IsoLanguage { code: "br", name: "Breton" },
    IsoLanguage { code: "bs", name: "Bosnian" },
    IsoLanguage { code: "bs-BA", name: "Bosnian (Bosnia and Herzegovina)" },
    IsoLanguage { code: "ca", name: "Catalan" },
    IsoLanguage { code: "ca-ES", name: "Catalan (Spain)" },
    IsoLanguage { code: "ce", name: "Chechen" },
    IsoLanguage { code: "ch", name: "Chamorro" },
    IsoLanguage { code: "cmn-CN", name: "Chinese" },
    IsoLanguage { code: "cmn-TW", name: "Chinese (Taiwan)" },
    IsoLanguage { code: "co", name: "Corsican" },
    IsoLanguage { code: "cr", name: "Cree" },
    IsoLanguage { code: "cs", name: "Czech" },
    IsoLanguage { code: "cs-CZ", name: "Czech (Czech Republic)" },
    IsoLanguage { code: "cu", name: "Church Slavonic" },
    IsoLanguage { code: "cv", name: "Chuvash" },
    IsoLanguage { code: "cy", name: "Welsh" },
    IsoLanguage { code: "cy-GB", name: "Welsh (United Kingdom)" },
    IsoLanguage { code: "da", name: "Danish" },
    IsoLanguage { code: "da-DK", name: "Danish (Denmark)" },
    IsoLanguage { code: "de", name: "German" },
    IsoLanguage { code: "de-AT", name: "German (Austria)" },
    IsoLanguage { code: "de-CH", name: "German (Switzerland)" },
    IsoLanguage { code: "de-DE", name: "German (Germany)" },
    IsoLanguage { code: "de-LI", name: "German (Liechtenstein)" },
    IsoLanguage { code: "de-LU", name: "German (Luxembourg)" },
    IsoLanguage { code: "dv", name: "Divehi" },
    IsoLanguage { code: "dv-MV", name: "Divehi (Maldives)" },
    IsoLanguage { code: "dz", name: "Dzongkha" },
    IsoLanguage { code: "ee", name: "Ewe" },
    IsoLanguage { code: "el", name: "Greek" },
    IsoLanguage { code: "el-GR", name: "Greek (Greece)" },
    IsoLanguage { code: "en", name: "English" },
    IsoLanguage { code: "en-AU", name: "English (Australia)" },
    IsoLanguage { code: "en-BZ", name: "English (Belize)" },
    IsoLanguage { code: "en-CA", name: "English (Canada)" },
    IsoLanguage { code: "en-CB", name: "English (Caribbean)" },
    IsoLanguage { code: "en-GB", name: "English (United Kingdom)" },
    IsoLanguage { code: "en-GB-WLS", name: "English (Welsh)" },
    IsoLanguage { code: "en-IE", name: "English (Ireland)" },
    IsoLanguage { code: "en-IN", name: "English (Indian)" },
    IsoLanguage { code: "en-JM", name: "English (Jamaica)" },
    IsoLanguage { code: "en-NZ", name: "English (New Zealand)" },
    IsoLanguage { code: "en-PH", name: "English (Republic of the Philippines)" },
    IsoLanguage { code: "en-TT", name: "English (Trinidad and Tobago)" },
    IsoLanguage { code: "en-US", name: "English (United States)" },
    IsoLanguage { code: "en-ZA", name: "English (South Africa)" },
    IsoLanguage { code: "en-ZW", name: "English (Zimbabwe)" },
    IsoLanguage { code: "eo", name: "Esperanto" },
    IsoLanguage { code: "es", name: "Spanish" },
    IsoLanguage { code: "es-AR", name: "Spanish (Argentina)" },
    IsoLanguage { code: "es-BO", name: "Spanish (Bolivia)" },
    IsoLanguage { code: "es-CL", name: "Spanish (Chile)" },
    IsoLanguage { code: "es-CO", name: "Spanish (Colombia)" },
    IsoLanguage { code: "es-CR", name: "Spanish (Costa Rica)" },
    IsoLanguage { code: "es-DO", name: "Spanish (Dominican Republic)" },
    IsoLanguage { code: "es-EC", name: "Spanish (Ecuador)" },
    IsoLanguage { code: "es-ES", name: "Spanish (Spain)" },
    IsoLanguage { code: "es-GT", name: "Spanish (Guatemala)" },
    IsoLanguage { code: "es-HN", name: "Spanish (Honduras)" },
    IsoLanguage { code: "es-MX", name: "Spanish (Mexico)" },
    IsoLanguage { code: "es-NI", name: "Spanish (Nicaragua)" },
    IsoLanguage { code: "es-PA", name: "Spanish (Panama)" },
    IsoLanguage { code: "es-PE", name: "Spanish (Peru)" },
    IsoLanguage { code: "es-PR", name: "Spanish (Puerto Rico)" },
    IsoLanguage { code: "es-PY", name: "Spanish (Paraguay)" },
    IsoLanguage { code: "es-SV", name: "Spanish (El Salvador)" },
    IsoLanguage { code: "es-US", name: "Spanish (United States)" },
    IsoLanguage { code: "es-UY", name: "Spanish (Uruguay)" },
    IsoLanguage { code: "es-VE", name: "Spanish (Venezuela)" },
    IsoLanguage { code: "et", name: "Estonian" },
    IsoLanguage { code: "et-EE", name: "Estonian (Estonia)" },
    IsoLanguage { code: "eu", name: "Basque" },
    IsoLanguage { code: "eu-ES", name: "Basque (Spain)" },
    IsoLanguage { code: "fa", name: "Farsi" },
    IsoLanguage { code: "fa-IR", name: "Farsi (Iran)" },
    IsoLanguage { code: "ff", name: "Fulah" },
    IsoLanguage { code: "fi", name: "Finnish" },
    IsoLanguage { code: "fi-FI", name: "Finnish (Finland)" },
    IsoLanguage { code: "fj", name: "Fijian" },
    IsoLanguage { code: "fo", name: "Faroese" },
    IsoLanguage { code: "fo-FO", name: "Faroese (Faroe Islands)" },
    IsoLanguage { code: "fr", name: "French" },
    IsoLanguage { code: "fr-BE", name: "French (Belgium)" },
    IsoLanguage { code: "fr-CA", name: "French (Canada)" },
    IsoLanguage { code: "fr-CH", name: "French (Switzerland)" },
    IsoLanguage { code: "fr-FR", name: "French (France)" },
    IsoLanguage { code: "fr-LU", name: "French (Luxembourg)" },
    IsoLanguage { code: "fr-MC", name: "French (Principality of Monaco)" },
    IsoLanguage { code: "fy", name: "Western Frisian" },
    IsoLanguage { code: "ga", name: "Irish" },
    IsoLanguage { code: "gd", name: "Gaelic" },
    IsoLanguage { code: "gl", name: "Galician" },
    IsoLanguage { code: "gl-ES", name: "Galician (Spain)" },
    IsoLanguage { code: "gn", name: "Guarani" },
    IsoLanguage { code: "gu", name: "Gujarati" },
    IsoLanguage { code: "gu-IN", name: "Gujarati (India)" },
    IsoLanguage { code: "gv", name: "Manx" },
    IsoLanguage { code: "ha", name: "Hausa" },
    IsoLanguage { code: "he", name: "Hebrew" },
    IsoLanguage { code: "he-IL", name: "Hebrew (Israel)" },
    IsoLanguage { code: "hi", name: "Hindi" },
    IsoLanguage { code: "hi-IN", name: "Hindi (India)" },
    IsoLanguage { code: "ho", name: "Hiri Motu" },
    IsoLanguage { code: "hr", name: "Croatian" },
    IsoLanguage { code: "hr-BA", name: "Croatian (Bosnia and Herzegovina)" },
    IsoLanguage { code: "hr-HR", name: "Croatian (Croatia)" },
    IsoLanguage { code: "ht", name: "Haitian" },
    IsoLanguage { code: "hu", name: "Hungarian" },
    IsoLanguage { code: "hu-HU", name: "Hungarian (Hungary)" },
    IsoLanguage { code: "hy", name: "Armenian" },
    IsoLanguage { code: "hy-AM", name: "Armenian (Armenia)" },
    IsoLanguage { code: "hz", name: "Herero" },
    IsoLanguage { code: "ia", name: "Interlingua (International Auxiliary Language Association)" },
    IsoLanguage { code: "id", name: "Indonesian" },
    IsoLanguage { code: "id-ID", name: "Indonesian (Indonesia)" },
    IsoLanguage { code: "ie", name: "Interlingue" },
    IsoLanguage { code: "ig", name: "Igbo" },
    IsoLanguage { code: "ii", name: "Sichuan Yi" },
    IsoLanguage { code: "ik", name: "Inupiaq" },
    IsoLanguage { code: "io", name: "Ido" },
    IsoLanguage { code: "is", name: "Icelandic" },
    IsoLanguage { code: "is-IS", name: "Icelandic (Iceland)" },
    IsoLanguage { code: "it", name: "Italian" },
    IsoLanguage { code: "it-CH", name: "Italian (Switzerland)" },
    IsoLanguage { code: "it-IT", name: "Italian (Italy)" },
    IsoLanguage { code: "iu", name: "Inuktitut" },
    IsoLanguage { code: "ja", name: "Japanese" },
    IsoLanguage { code: "ja-JP", name: "Japanese (Japan)" },
    IsoLanguage { code: "jv", name: "Javanese" },
    IsoLanguage { code: "ka", name: "Georgian" },
    IsoLanguage { code: "ka-GE", name: "Georgian (Georgia)" },
    IsoLanguage { code: "kg", name: "Kongo" },
    IsoLanguage { code: "ki", name: "Kikuyu" },
    IsoLanguage { code: "kj", name: "Kuanyama" },
    IsoLanguage { code: "kk", name: "Kazakh" },
    IsoLanguage { code: "kk-KZ", name: "Kazakh (Kazakhstan)" },
    IsoLanguage { code: "kl", name: "Kalaallisut" },
    IsoLanguage { code: "km", name: "Central Khmer" },
    IsoLanguage { code: "kn", name: "Kannada" },
    IsoLanguage { code: "kn-IN", name: "Kannada (India)" },
    IsoLanguage { code: "ko", name: "Korean" },
    IsoLanguage { code: "ko-KR", name: "Korean (Korea)" },
    IsoLanguage { code: "kok", name: "Konkani" },
    IsoLanguage { code: "kok-IN", name: "Konkani (India)" },
    IsoLanguage { code: "kr", name: "Kanuri" },
    IsoLanguage { code: "ks", name: "Kashmiri" },
    IsoLanguage { code: "ku", name: "Kurdish" },
    IsoLanguage { code: "kv", name: "Komi" },
    IsoLanguage { code: "kw", name: "Cornish" },
    IsoLanguage { code: "ky", name: "Kyrgyz" },
    IsoLanguage { code: "ky-KG", name: "Kyrgyz (Kyrgyzstan)" },
    IsoLanguage { code: "la", name: "Latin" },
    IsoLanguage { code: "lb", name: "Luxembourgish" },
    IsoLanguage { code: "lg", name: "Ganda" },
    IsoLanguage { code: "li", name: "Limburgan" },
    IsoLanguage { code: "ln", name: "Lingala" },
    IsoLanguage { code: "lo", name: "Lao" },
    IsoLanguage { code: "lt", name: "Lithuanian" },
    IsoLanguage { code: "lt-LT", name: "Lithuanian (Lithuania)" },
    IsoLanguage { code: "lu", name: "Luba-Katanga" },
    IsoLanguage { code: "lv", name: "Latvian" },
    IsoLanguage { code: "lv-LV", name: "Latvian (Latvia)" },
    IsoLanguage { code: "mg", name: "Malagasy" },
    IsoLanguage { code: "mh", name: "Marshallese" },
    IsoLanguage { code: "mi", name: "Maori" },
    IsoLanguage { code: "mi-NZ", name: "Maori (New Zealand)" },
    IsoLanguage { code: "mk", name: "FYRO Macedonian" },
    IsoLanguage { code: "mk-MK", name: "FYRO Macedonian (Former Yugoslav Republic of Macedonia)" },
    IsoLanguage { code: "ml", name: "Malayalam" },
    IsoLanguage { code: "mn", name: "Mongolian" },
    IsoLanguage { code: "mn-MN", name: "Mongolian (Mongolia)" },
    IsoLanguage { code: "mr", name: "Marathi" },
    IsoLanguage { code: "mr-IN", name: "Marathi (India)" },
    IsoLanguage { code: "ms", name: "Malay" },
    IsoLanguage { code: "ms-BN", name: "Malay (Brunei Darussalam)" },
    IsoLanguage { code: "ms-MY", name: "Malay (Malaysia)" },
    IsoLanguage { code: "mt", name: "Maltese" },
    IsoLanguage { code: "mt-MT", name: "Maltese (Malta)" },
    IsoLanguage { code: "my", name: "Burmese" },
    IsoLanguage { code: "na", name: "Nauru" },
    IsoLanguage { code: "nb", name: "Norwegian (Bokmål)" },
    IsoLanguage { code: "nb-NO", name: "Norwegian (Bokmål) (Norway)" },
    IsoLanguage { code: "nd", name: "North Ndebele" },
    IsoLanguage { code: "ne", name: "Nepali" },
    IsoLanguage { code: "ng", name: "Ndonga" },
    IsoLanguage { code: "nl", name: "Dutch" },
    IsoLanguage { code: "nl-BE", name: "Dutch (Belgium)" },
    IsoLanguage { code: "nl-NL", name: "Dutch (Netherlands)" },
    IsoLanguage { code: "nn", name: "Norwegian Nynorsk" },
    IsoLanguage { code: "nn-NO", name: "Norwegian (Nynorsk) (Norway)" },
    IsoLanguage { code: "no", name: "Norwegian" },
    IsoLanguage { code: "nr", name: "South Ndebele" },
    IsoLanguage { code: "ns", name: "Northern Sotho" },
    IsoLanguage { code: "ns-ZA", name: "Northern Sotho (South Africa)" },
    IsoLanguage { code: "nv", name: "Navajo" },
    IsoLanguage { code: "ny", name: "Chichewa" },
    IsoLanguage { code: "oc", name: "Occitan" },
    IsoLanguage { code: "oj", name: "Ojibwa" },
    IsoLanguage { code: "om", name: "Oromo" },
    IsoLanguage { code: "or", name: "Oriya" },
    IsoLanguage { code: "os", name: "Ossetian" },
    IsoLanguage { code: "pa", name: "Punjabi" },
    IsoLanguage { code: "pa-IN", name: "Punjabi (India)" },
    IsoLanguage { code: "pi", name: "Pali" },
    IsoLanguage { code: "pl", name: "Polish" },
    IsoLanguage { code: "pl-PL", name: "Polish (Poland)" },
    IsoLanguage { code: "ps", name: "Pashto" },
    IsoLanguage { code: "ps-AR", name: "Pashto (Afghanistan)" },
    IsoLanguage { code: "pt", name: "Portuguese" },
    IsoLanguage { code: "pt-BR", name: "Portuguese (Brazil)" },
    IsoLanguage { code: "pt-PT", name: "Portuguese (Portugal)" },
    IsoLanguage { code: "qu", name: "Quechua" },
    IsoLanguage { code: "qu-BO", name: "Quechua (Bolivia)" },
    IsoLanguage { code: "qu-EC", name: "Quechua (Ecuador)" },
    IsoLanguage { code: "qu-PE", name: "Quechua (Peru)" },
    IsoLanguage { code: "rm", name: "Romansh" },
    IsoLanguage { code: "rn", name: "Rundi" },
    IsoLanguage { code: "ro", name: "Romanian" },
    IsoLanguage { code: "ro-RO", name: "Romanian (Romania)" },
    IsoLanguage { code: "ru", name: "Russian" },
    IsoLanguage { code: "ru-RU", name: "Russian (Russia)" },
    IsoLanguage { code: "rw", name: "Kinyarwanda" },
    IsoLanguage { code: "sa", name: "Sanskrit" },
    IsoLanguage { code: "sa-IN", name: "Sanskrit (India)" },
    IsoLanguage { code: "sc", name: "Sardinian" },
    IsoLanguage { code: "sd", name: "Sindhi" },
    IsoLanguage { code: "se", name: "Sami (Northern)" },
    IsoLanguage { code: "se-FI", name: "Sami (Northern) (Finland)" },
    IsoLanguage { code: "se-NO", name: "Sami (Northern) (Norway)" },
    IsoLanguage { code: "se-SE", name: "Sami (Northern) (Sweden)" },
    IsoLanguage { code: "sg", name: "Sango" },
    IsoLanguage { code: "si", name: "Sinhala" },
    IsoLanguage { code: "sk", name: "Slovak" },
    IsoLanguage { code: "sk-SK", name: "Slovak (Slovakia)" },
    IsoLanguage { code: "sl", name: "Slovenian" },
    IsoLanguage { code: "sl-SI", name: "Slovenian (Slovenia)" },
    IsoLanguage { code: "sm", name: "Samoan" },
    IsoLanguage { code: "sn", name: "Shona" },
    IsoLanguage { code: "so", name: "Somali" },
    IsoLanguage { code: "sq", name: "Albanian" },
    IsoLanguage { code: "sq-AL", name: "Albanian (Albania)" },
    IsoLanguage { code: "sr", name: "Serbian" },
    IsoLanguage { code: "sr-BA", name: "Serbian (Latin) (Bosnia and Herzegovina)" },
    IsoLanguage { code: "sr-SP", name: "Serbian (Latin) (Serbia and Montenegro)" },
    IsoLanguage { code: "ss", name: "Swati" },
    IsoLanguage { code: "st", name: "Southern Sotho" },
    IsoLanguage { code: "su", name: "Sundanese" },
    IsoLanguage { code: "sv", name: "Swedish" },
    IsoLanguage { code: "sv-FI", name: "Swedish (Finland)" },
    IsoLanguage { code: "sv-SE", name: "Swedish (Sweden)" },
    IsoLanguage { code: "sw", name: "Swahili" },
    IsoLanguage { code: "sw-KE", name: "Swahili (Kenya)" },
    IsoLanguage { code: "syr", name: "Syriac" },
    IsoLanguage { code: "syr-SY", name: "Syriac (Syria)" },
    IsoLanguage { code: "ta", name: "Tamil" },
    IsoLanguage { code: "ta-IN", name: "Tamil (India)" },
    IsoLanguage { code: "te", name: "Telugu" },
    IsoLanguage { code: "te-IN", name: "Telugu (India)" },
    IsoLanguage { code: "tg", name: "Tajik" },
    IsoLanguage { code: "th", name: "Thai" },
    IsoLanguage { code: "th-TH", name: "Thai (Thailand)" },
    IsoLanguage { code: "ti", name: "Tigrinya" },
    IsoLanguage { code: "tk", name: "Turkmen" },
    IsoLanguage { code: "tl", name: "Tagalog" },
    IsoLanguage { code: "tl-PH", name: "Tagalog (Philippines)" },
    IsoLanguage { code: "tn", name: "Tswana" },
    IsoLanguage { code: "tn-ZA", name: "Tswana (South Africa)" },
    IsoLanguage { code: "to", name: "Tonga (Tonga Islands)" },
    IsoLanguage { code: "tr", name: "Turkish" },
    IsoLanguage { code: "tr-TR", name: "Turkish (Turkey)" },
    IsoLanguage { code: "ts", name: "Tsonga" },
    IsoLanguage { code: "tt", name: "Tatar" },
    IsoLanguage { code: "tt-RU", name: "Tatar (Russia)" },
    IsoLanguage { code: "tw", name: "Twi" },
    IsoLanguage { code: "ty", name: "Tahitian" },
    IsoLanguage { code: "ug", name: "Uighur" },
    IsoLanguage { code: "uk", name: "Ukrainian" },
    IsoLanguage { code: "uk-UA", name: "Ukrainian (Ukraine)" },
    IsoLanguage { code: "ur", name: "Urdu" },
    IsoLanguage { code: "ur-PK", name: "Urdu (Islamic Republic of Pakistan)" },
    IsoLanguage { code: "uz", name: "Uzbek (Latin)" },
    IsoLanguage { code: "uz-UZ", name: "Uzbek (Latin) (Uzbekistan)" },
    IsoLanguage { code: "ve", name: "Venda" },
    IsoLanguage { code: "vi", name: "Vietnamese" },
    IsoLanguage { code: "vi-VN", name: "Vietnamese (Viet Nam)" },
    IsoLanguage { code: "vo", name: "Volapük" },
    IsoLanguage { code: "wa", name: "Walloon" },
    IsoLanguage { code: "wo", name: "Wolof" },
    IsoLanguage { code: "xh", name: "Xhosa" },
    IsoLanguage { code: "xh-ZA", name: "Xhosa (South Africa)" },
    IsoLanguage { code: "yi", name: "Yiddish" },
    IsoLanguage { code: "yo", name: "Yoruba" },
    IsoLanguage { code: "yue-CN", name: "Chinese (Yue)" },
    IsoLanguage { code: "za", name: "Zhuang" },
    IsoLanguage { code: "zh", name: "Chinese" },
    IsoLanguage { code: "zh-CN", name: "Chinese (Simplified)" },
    IsoLanguage { code: "zh-HK", name: "Chinese (Hong Kong)" },
    IsoLanguage { code: "zh-MO", name: "Chinese (Macau)" },
    IsoLanguage { code: "zh-SG", name: "Chinese (Singapore)" },
    IsoLanguage { code: "zh-TW", name: "Chinese (Taiwan)" },
    IsoLanguage { code: "zu", name: "Zulu" },
    IsoLanguage { code: "zu-ZA", name: "Zulu (South Africa)" },
];

/// Whether `code` is one of the reserved languages.
#[must_use]
pub fn is_reserved(code: &str) -> bool {
    RESERVED_LANGUAGE_CODES.contains(&code)
}

/// Whether `code` is a known language or locale code.
#[must_use]
pub fn is_known(code: &str) -> bool {
    ISO_LANGUAGES.iter().any(|language| language.code == code)
}

/// Every code, in table order.
pub fn full_iso_list() -> impl Iterator<Item = &'static str> {
    ISO_LANGUAGES.iter().map(|language| language.code)
}

/// Codes that may be customised: the full list without the reserved ones.
pub fn customisable_iso_list() -> impl Iterator<Item = &'static str> {
    full_iso_list().filter(|code| !is_reserved(code))
}

/// Sorted, back-quoted list for documentation.
#[must_use]
pub fn full_iso_list_string() -> String {
    backquoted(full_iso_list())
}

/// Sorted, back-quoted reserved list for documentation.
#[must_use]
pub fn reserved_list_string() -> String {
    backquoted(RESERVED_LANGUAGE_CODES.iter().copied())
}

fn backquoted<'a>(codes: impl Iterator<Item = &'a str>) -> String {
    let mut codes: Vec<&str> = codes.collect();
    codes.sort_unstable();
    codes
        .iter()
        .map(|code| format!("`{code}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_codes_are_known() {
        for code in RESERVED_LANGUAGE_CODES {
            assert!(is_known(code), "{code}");
        }
    }

    #[test]
    fn test_customisable_excludes_reserved() {
        assert!(customisable_iso_list().all(|code| !is_reserved(code)));
        assert_eq!(
            customisable_iso_list().count() + RESERVED_LANGUAGE_CODES.len(),
            ISO_LANGUAGES.len()
        );
        assert!(customisable_iso_list().any(|code| code == "en-GB"));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<&str> = full_iso_list().collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), ISO_LANGUAGES.len());
    }

    #[test]
    fn test_reserved_string_is_sorted() {
        assert!(reserved_list_string().starts_with("`cs`, `de`, `en`, `es`, `fr`, `fr-CA`"));
    }
}
