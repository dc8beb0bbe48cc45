//! Compiled-in word lists, grouped by difficulty level.

/// Single letters, for learning the keyboard layout.
pub(super) const LETTERS: &[&str] = &[
    "a", "b", "c", "d", "e", "f", "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r",
    "s", "t", "u", "v", "w", "x", "y", "z",
];

/// Short two-letter words.
pub(super) const TWO_LETTER: &[&str] = &[
    "at", "an", "am", "as", "ax", "be", "by", "do", "go", "he", "hi", "if", "in", "is", "it", "me",
    "my", "no", "of", "on", "or", "so", "to", "up", "us", "we",
];

/// Consonant-vowel-consonant phonics words, by vowel family.
pub(super) const CVC: &[&str] = &[
    // short a
    "bat", "cat", "hat", "mat", "rat", "sat", "fat", "pat", "van", "man", "can", "ran", "pan",
    "tan", "bag", "tag", "wag", "rag", "dad", "mad",
    // short e
    "bed", "red", "led", "fed", "pet", "met", "net", "wet", "set", "jet", "get", "let", "hen",
    "pen", "ten", "men", "den",
    // short i
    "big", "dig", "fig", "pig", "wig", "bit", "fit", "hit", "kit", "sit", "lit", "pit", "bin",
    "fin", "pin", "tin", "win", "kid", "lid", "rid",
    // short o
    "box", "fox", "dog", "log", "hog", "fog", "jog", "hot", "pot", "dot", "not", "got", "lot",
    "mom", "top", "hop", "mop", "pop", "cop",
    // short u
    "bug", "hug", "mug", "rug", "tug", "jug", "bus", "gum", "sun", "run", "fun", "bun", "cup",
    "pup", "cut", "but", "nut", "hut",
];

/// Dolch pre-primer sight words.
pub(super) const KINDERGARTEN: &[&str] = &[
    "a", "and", "away", "big", "blue", "can", "come", "down", "find", "for", "funny", "go", "help",
    "here", "i", "in", "is", "it", "jump", "little", "look", "make", "me", "my", "not", "one",
    "play", "red", "run", "said", "see", "the", "three", "to", "two", "up", "we", "where",
    "yellow", "you",
];

/// Dolch primer sight words.
pub(super) const FIRST_GRADE: &[&str] = &[
    "all", "am", "are", "at", "ate", "be", "black", "brown", "but", "came", "did", "do", "eat",
    "four", "get", "good", "have", "he", "into", "like", "must", "new", "no", "now", "on", "our",
    "out", "please", "pretty", "ran", "ride", "saw", "say", "she", "so", "soon", "that", "there",
    "they", "this", "too", "under", "want", "was", "well", "went", "what", "white", "who", "will",
    "with", "yes",
];

pub(super) const ANIMALS: &[&str] = &[
    "cat", "dog", "pig", "cow", "hen", "fox", "bee", "bug", "ant", "bat", "bear", "deer", "duck",
    "fish", "frog", "goat", "lion", "seal", "swan", "wolf",
];

pub(super) const COLORS: &[&str] = &[
    "red", "blue", "pink", "green", "white", "black", "brown", "yellow", "orange", "purple",
];

pub(super) const FAMILY: &[&str] = &[
    "mom", "dad", "son", "baby", "aunt", "uncle", "sister", "brother", "grandma", "grandpa",
];

/// Every built-in level, in menu order.
pub(super) const BUILTIN_LEVELS: &[(&str, &[&str])] = &[
    ("letters", LETTERS),
    ("twoLetter", TWO_LETTER),
    ("cvc", CVC),
    ("kindergarten", KINDERGARTEN),
    ("firstGrade", FIRST_GRADE),
    ("animals", ANIMALS),
    ("colors", COLORS),
    ("family", FAMILY),
];
