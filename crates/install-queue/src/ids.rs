//! Human-friendly job identifiers.
//!
//! Ids look like `gently-brave-otter` and double as staging folder names,
//! so each candidate is checked against the entries already present under
//! the base path.

use std::path::Path;

use rand::Rng;
use tracing::{debug, warn};
use uuid::Uuid;

/// Word-based candidates tried before falling back to a UUID.
pub const MAX_ID_TRIES: usize = 100;

const ADVERBS: &[&str] = &[
    "ably", "abruptly", "absolutely", "actively", "adequately", "admittedly", "adversely",
    "allegedly", "amazingly", "amply", "angrily", "annually", "anxiously", "arguably", "awfully",
    "badly", "barely", "basically", "blindly", "boldly", "bravely", "briefly", "brightly",
    "briskly", "broadly", "busily", "calmly", "carefully", "casually", "certainly", "cheaply",
    "cheerfully", "clearly", "cleverly", "closely", "commonly", "correctly", "crisply", "curiously",
    "daily", "daringly", "dearly", "decently", "deeply", "definitely", "deftly", "deliberately",
    "directly", "distinctly", "dimly", "eagerly", "early", "easily", "endlessly", "entirely",
    "equally", "eternally", "evenly", "exactly", "expertly", "fairly", "faithfully", "famously",
    "fast", "finally", "firmly", "fondly", "formally", "frankly", "freely", "frequently", "fully",
    "gently", "genuinely", "gladly", "gleefully", "globally", "gracefully", "gradually", "greatly",
    "happily", "hardly", "heartily", "heavily", "highly", "honestly", "hopelessly", "hugely",
    "humbly", "ideally", "immensely", "infinitely", "initially", "innocently", "instantly",
    "intensely", "jointly", "jolly", "joyfully", "justly", "keenly", "kindly", "largely", "lastly",
    "lately", "lazily", "legally", "lightly", "likely", "literally", "lively", "locally",
    "logically", "loosely", "loudly", "lovingly", "loyally", "luckily", "madly", "mainly",
    "manually", "markedly", "merely", "merrily", "mildly", "minutely", "modestly", "monthly",
    "morally", "mostly", "mutually", "namely", "naturally", "nearly", "neatly", "newly", "nicely",
    "nightly", "nobly", "normally", "notably", "noticeably", "obviously", "oddly", "officially",
    "openly", "optimally", "orderly", "overly", "partly", "patiently", "perfectly", "personally",
    "physically", "plainly", "pleasantly", "poetically", "politely", "positively", "possibly",
    "powerfully", "precisely", "presently", "previously", "primarily", "privately", "probably",
    "promptly", "properly", "proudly", "publicly", "purely", "quickly", "quietly", "quite",
    "rapidly", "rarely", "readily", "really", "reasonably", "recently", "regularly", "reliably",
    "remarkably", "repeatedly", "richly", "rightly", "roughly", "routinely", "rudely", "safely",
    "scarcely", "seemingly", "selflessly", "sensibly", "separately", "seriously", "severely",
    "sharply", "sheerly", "shortly", "shyly", "silently", "simply", "sincerely", "singularly",
    "slightly", "slowly", "smartly", "smoothly", "socially", "softly", "solely", "solidly",
    "specially", "speedily", "squarely", "steadily", "sternly", "strictly", "strongly", "subtly",
    "suddenly", "suitably", "supremely", "surely", "sweetly", "swiftly", "tenderly", "terribly",
    "thankfully", "thoroughly", "tightly", "totally", "truly", "typically", "ultimately",
    "uniquely", "urgently", "usefully", "usually", "utterly", "vaguely", "vastly", "verbally",
    "vitally", "vividly", "warmly", "weekly", "wholly", "widely", "wildly", "willingly", "wisely",
    "wonderfully", "yearly", "zealously",
];

const ADJECTIVES: &[&str] = &[
    "able", "adept", "agile", "alert", "amber", "ample", "amused", "apt", "ardent", "artful",
    "awake", "balmy", "basic", "bold", "boss", "brave", "bright", "brisk", "broad", "busy", "calm",
    "capable", "careful", "casual", "certain", "charming", "cheery", "chief", "civil", "clean",
    "clear", "clever", "close", "cool", "cosmic", "cozy", "crack", "crisp", "cuddly", "curious",
    "daring", "dashing", "dear", "decent", "deep", "divine", "driven", "dry", "eager", "early",
    "easy", "elated", "elegant", "enabled", "epic", "equal", "even", "exact", "excited", "expert",
    "fair", "faithful", "famous", "fancy", "fast", "fine", "firm", "first", "fit", "fleet",
    "fluent", "flying", "fond", "frank", "free", "fresh", "friendly", "full", "fun", "funny",
    "gentle", "genuine", "giving", "glad", "glorious", "glowing", "golden", "good", "grand",
    "grateful", "great", "green", "growing", "handy", "happy", "hardy", "harmless", "healthy",
    "helped", "helpful", "heroic", "hip", "holy", "honest", "hopeful", "humane", "humble", "ideal",
    "immune", "intent", "jolly", "joint", "just", "keen", "kind", "large", "lasting", "legal",
    "lenient", "level", "light", "liked", "literate", "live", "lively", "logical", "loved",
    "loving", "loyal", "lucky", "magical", "main", "major", "master", "mature", "measured",
    "mellow", "merry", "mighty", "mint", "modern", "modest", "moral", "moved", "moving", "musical",
    "mutual", "native", "natural", "neat", "needed", "new", "next", "nice", "nimble", "noble",
    "normal", "notable", "noted", "novel", "obliging", "oak", "open", "optimal", "organic",
    "outgoing", "patient", "peaceful", "perfect", "pet", "picked", "pleasant", "pleased", "plucky",
    "poetic", "polished", "polite", "popular", "positive", "possible", "powerful", "precious",
    "premium", "prepared", "present", "pretty", "prime", "primed", "probable", "prompt", "proper",
    "proud", "pumped", "pure", "quick", "quiet", "rapid", "rare", "ready", "real", "refined",
    "regular", "relaxed", "relevant", "relieved", "renewed", "resolved", "rested", "rich", "right",
    "robust", "romantic", "rosy", "royal", "rustic", "safe", "saved", "secure", "select",
    "sensible", "set", "settling", "sharp", "shining", "shiny", "simple", "sincere", "skilled",
    "smart", "smooth", "social", "solid", "sound", "special", "splendid", "square", "stable",
    "star", "steady", "sterling", "still", "stirring", "strong", "stunning", "subtle", "suitable",
    "summary", "sunny", "super", "superb", "supreme", "sure", "sweet", "swift", "talented",
    "teaching", "tender", "thankful", "thorough", "tidy", "tight", "tops", "touched", "tough",
    "true", "trusted", "trusting", "ultimate", "unbiased", "united", "up", "upbeat", "upward",
    "usable", "useful", "valid", "valued", "vast", "verified", "viable", "vital", "vivid", "warm",
    "wanted", "wealthy", "welcome", "well", "whole", "willing", "winning", "wise", "witty",
    "wondrous", "workable", "worthy",
];

const NAMES: &[&str] = &[
    "aardvark", "adder", "albatross", "alpaca", "anchovy", "anole", "ant", "anteater", "antelope",
    "ape", "armadillo", "asp", "baboon", "badger", "barracuda", "basilisk", "bass", "bat", "bear",
    "beaver", "bee", "beetle", "bird", "bison", "boa", "boar", "bobcat", "bonobo", "buck",
    "buffalo", "bug", "bull", "bunny", "burro", "buzzard", "calf", "camel", "canary", "capybara",
    "cardinal", "caribou", "carp", "cat", "catfish", "cattle", "chamois", "cheetah", "chicken",
    "chimp", "chipmunk", "clam", "cobra", "cod", "collie", "condor", "coral", "cougar", "cow",
    "coyote", "crab", "crane", "crayfish", "cricket", "crow", "cub", "dane", "deer", "dingo",
    "dodo", "doe", "dog", "dolphin", "donkey", "dory", "dove", "dragon", "drake", "duck", "eagle",
    "eel", "egret", "eland", "elephant", "elk", "emu", "ewe", "falcon", "fawn", "ferret", "filly",
    "finch", "fish", "flamingo", "flea", "fly", "foal", "fowl", "fox", "frog", "gannet", "gar",
    "gator", "gazelle", "gecko", "gelding", "ghost", "gibbon", "giraffe", "glider", "gnat", "gnu",
    "goat", "goldfish", "goose", "gopher", "gorilla", "griffin", "grouse", "grub", "guinea", "gull",
    "guppy", "haddock", "hagfish", "halibut", "hamster", "hare", "hawk", "hedgehog", "hen", "heron",
    "herring", "hippo", "hog", "hornet", "horse", "hound", "humbug", "husky", "hyena", "ibex",
    "ibis", "iguana", "impala", "insect", "jackal", "jaguar", "jay", "jennet", "joey", "kangaroo",
    "katydid", "kid", "kingfish", "kit", "kite", "kitten", "kiwi", "koala", "krill", "lab",
    "lacewing", "ladybug", "lamb", "lark", "leech", "lemming", "lemur", "leopard", "liger",
    "limpet", "lion", "lionfish", "lizard", "llama", "lobster", "locust", "loon", "louse", "lynx",
    "macaque", "macaw", "magpie", "mako", "mallard", "mammal", "mammoth", "manatee", "mantis",
    "marlin", "marmoset", "marmot", "marten", "martin", "mastiff", "mayfly", "meerkat", "midge",
    "mink", "minnow", "mite", "mole", "mollusk", "molly", "monarch", "mongoose", "monkey", "moose",
    "moray", "moth", "mouse", "mule", "mullet", "muskrat", "mustang", "mutt", "narwhal", "newt",
    "ocelot", "octopus", "opossum", "orca", "oriole", "oryx", "osprey", "ostrich", "otter", "owl",
    "ox", "oyster", "panda", "panther", "parrot", "partridge", "peacock", "pegasus", "pelican",
    "penguin", "perch", "pheasant", "pig", "pigeon", "pika", "pike", "piranha", "platypus",
    "polecat", "pony", "poodle", "porpoise", "possum", "prawn", "primate", "pug", "puma", "pup",
    "python", "quagga", "quail", "rabbit", "raccoon", "racer", "ram", "rat", "raven", "redbird",
    "reindeer", "reptile", "rhino", "roach", "robin", "rodent", "rooster", "sailfish", "salmon",
    "sawfish", "scorpion", "seagull", "seahorse", "seal", "serval", "shad", "shark", "sheep",
    "shiner", "shrew", "shrimp", "skink", "skunk", "sloth", "slug", "snail", "snake", "snapper",
    "snipe", "sole", "sparrow", "spider", "sponge", "squid", "squirrel", "stag", "starfish",
    "stingray", "stork", "sturgeon", "sunbeam", "sunfish", "swan", "swift", "swine", "tahr",
    "tapir", "tarpon", "teal", "termite", "tern", "terrier", "tetra", "thrush", "tick", "tiger",
    "titmouse", "toad", "tomcat", "tortoise", "toucan", "trout", "tuna", "turkey", "turtle",
    "unicorn", "urchin", "vervet", "viper", "vole", "vulture", "wahoo", "walrus", "warthog", "wasp",
    "weasel", "whale", "whippet", "wildcat", "wolf", "wombat", "worm", "wren", "yak", "zebra",
];

/// Generates a job id that does not name an existing entry under `base_path`.
///
/// After [`MAX_ID_TRIES`] collisions a UUID v4 is returned without a check.
/// UUID generation panics if the OS random source fails; that unwind is
/// reported by [`crate::fatal::supervise`].
pub fn generate_id(base_path: &Path) -> String {
    generate_id_with(base_path, petname)
}

/// Same as [`generate_id`] with a custom candidate generator.
pub fn generate_id_with(base_path: &Path, mut candidate: impl FnMut() -> String) -> String {
    for attempt in 1..=MAX_ID_TRIES {
        let id = candidate();
        match std::fs::symlink_metadata(base_path.join(&id)) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return id,
            _ => debug!(attempt, %id, "job id already taken"),
        }
    }

    warn!(
        base = %base_path.display(),
        tries = MAX_ID_TRIES,
        "could not find a free word id, falling back to UUID"
    );
    Uuid::new_v4().to_string()
}

/// Three random words joined by hyphens.
pub fn petname() -> String {
    let mut rng = rand::rng();
    format!(
        "{}-{}-{}",
        ADVERBS[rng.random_range(0..ADVERBS.len())],
        ADJECTIVES[rng.random_range(0..ADJECTIVES.len())],
        NAMES[rng.random_range(0..NAMES.len())],
    )
}
